use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::storage::DirStorage;
use crate::io::store::STORAGE_KEY;
use crate::io::watcher::StorageWatcher;
use crate::model::{AppConfig, Backend, FilterType, Notification, Todo, TodoId};
use crate::ops::view::{self, Counts};
use crate::ops::{Command, Outcome, TodoList};
use crate::util::text_input::TextInput;

use super::input;
use super::render;
use super::theme::Theme;

/// How long a notification stays in the status row
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new todo into the add form
    Add,
    /// Editing the text of an existing todo
    Edit(TodoId),
}

/// A notification on screen and when it appeared
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub list: TodoList,
    pub filter: FilterType,
    pub mode: Mode,
    pub input: TextInput,
    /// Index into the visible (filtered) todos
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
}

impl App {
    pub fn new(list: TodoList, config: &AppConfig) -> Self {
        App {
            list,
            filter: FilterType::All,
            mode: Mode::Navigate,
            input: TextInput::new(),
            cursor: 0,
            scroll_offset: 0,
            toast: None,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
        }
    }

    /// Todos shown under the current filter
    pub fn visible(&self) -> Vec<&Todo> {
        view::filter_todos(self.list.todos(), self.filter)
    }

    pub fn counts(&self) -> Counts {
        view::counts(self.list.todos())
    }

    pub fn selected(&self) -> Option<&Todo> {
        self.visible().get(self.cursor).copied()
    }

    pub fn selected_id(&self) -> Option<TodoId> {
        self.selected().map(|t| t.id.clone())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn jump_to_end(&mut self) {
        self.cursor = self.visible().len().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        if self.filter != filter {
            self.filter = filter;
            self.cursor = 0;
            self.scroll_offset = 0;
        }
    }

    /// Run one command against the list and surface its notification.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let is_add = matches!(command, Command::Add(_));
        let outcome = self.list.dispatch(command);
        if let Some(n) = outcome.notification() {
            self.show(n.clone());
        }
        if is_add && matches!(outcome, Outcome::Applied(_)) {
            self.cursor = 0;
        }
        self.clamp_cursor();
        outcome
    }

    /// Re-read the list from the store, keeping the cursor on the same todo when possible.
    pub fn reload(&mut self) {
        let selected = self.selected_id();
        match self.list.reload() {
            Ok(()) => {
                let pos = selected.and_then(|id| self.visible().iter().position(|t| t.id == id));
                if let Some(pos) = pos {
                    self.cursor = pos;
                }
                let editing_gone =
                    matches!(&self.mode, Mode::Edit(id) if self.list.get(id).is_none());
                if editing_gone {
                    self.mode = Mode::Navigate;
                    self.input.take();
                }
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.show(Notification::destructive("Could not reload todos", e.to_string()));
            }
        }
    }

    pub fn show(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    /// Drop the toast once it has been visible for `TOAST_TTL`.
    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_TTL)
        {
            self.toast = None;
        }
    }
}

/// Launch the TUI over an opened list.
pub fn run(home: &Path, config: &AppConfig, list: TodoList) -> Result<(), Box<dyn std::error::Error>> {
    let watcher = if list.backend() == Backend::Local {
        let path = DirStorage::new(home).path_for(STORAGE_KEY);
        match StorageWatcher::start(&path) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, "storage watcher unavailable");
                None
            }
        }
    } else {
        None
    };

    let mut app = App::new(list, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if we panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StorageWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if watcher.is_some_and(StorageWatcher::poll) {
            tracing::debug!("storage changed on disk, reloading");
            app.reload();
        }
        app.expire_toast(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
