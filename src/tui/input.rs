use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::FilterType;
use crate::ops::Command;
use crate::util::text_input::TextInput;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add(app, key),
        Mode::Edit(_) => handle_edit(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.jump_to_end(),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.selected_id() {
                app.dispatch(Command::Toggle(id));
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => begin_edit(app),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_id() {
                app.dispatch(Command::Delete(id));
            }
        }
        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.input = TextInput::new();
            app.mode = Mode::Add;
        }
        KeyCode::Tab => {
            let next = app.filter.next();
            app.set_filter(next);
        }
        KeyCode::Char('1') => app.set_filter(FilterType::All),
        KeyCode::Char('2') => app.set_filter(FilterType::Active),
        KeyCode::Char('3') => app.set_filter(FilterType::Completed),
        KeyCode::Char('C') => {
            app.dispatch(Command::MarkAllComplete);
        }
        KeyCode::Char('X') => {
            app.dispatch(Command::ClearCompleted);
        }
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}

/// Completed todos are read-only until reactivated
fn begin_edit(app: &mut App) {
    let Some(todo) = app.selected() else {
        return;
    };
    if todo.completed {
        return;
    }
    let (id, input) = (todo.id.clone(), TextInput::with_text(&todo.text));
    app.input = input;
    app.mode = Mode::Edit(id);
}

fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.take();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            // Blank input does not submit; the form just stays open
            if !app.input.is_blank() {
                let text = app.input.take();
                app.dispatch(Command::Add(text));
            }
        }
        _ => edit_text(&mut app.input, key),
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    let Mode::Edit(id) = app.mode.clone() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.input.take();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if !app.input.is_blank() {
                let command = Command::Edit(id, app.input.take());
                app.mode = Mode::Navigate;
                app.dispatch(command);
            }
        }
        _ => edit_text(&mut app.input, key),
    }
}

/// Shared line-editing keys for the add and edit inputs
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('w') if ctrl => input.delete_word(),
        KeyCode::Char('a') if ctrl => input.home(),
        KeyCode::Char('e') if ctrl => input.end(),
        KeyCode::Char(c) if !ctrl => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}
