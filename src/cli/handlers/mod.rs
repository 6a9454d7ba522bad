mod auth;
pub use auth::{cmd_login, cmd_logout};

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::store::{self, StoreError};
use crate::model::{AppConfig, FilterType, ParseFilterError, Todo, TodoId, normalize_text};
use crate::ops::{Command, LookupError, Outcome, TodoList, view};

/// Errors reported by CLI commands (on top of store and config errors)
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),
    #[error("todo text is blank")]
    BlankText,
    #[error("{title}: {description}")]
    Failed { title: String, description: String },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, home: &Path, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            // Session management (doesn't need a store)
            Commands::Login(args) => cmd_login(args, home, config, json),
            Commands::Logout => cmd_logout(home, json),

            // Read commands
            Commands::List(args) => cmd_list(args, home, config, json),
            Commands::Stats => cmd_stats(home, config, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, home, config, json),
            Commands::Toggle(args) => cmd_toggle(args, home, config, json),
            Commands::Edit(args) => cmd_edit(args, home, config, json),
            Commands::Delete(args) => cmd_delete(args, home, config, json),
            Commands::ClearCompleted => cmd_bulk(Command::ClearCompleted, home, config, json),
            Commands::CompleteAll => cmd_bulk(Command::MarkAllComplete, home, config, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the configured store and load the list from it.
pub fn open_list(home: &Path, config: &AppConfig) -> Result<TodoList, StoreError> {
    let store = store::open_store(home, config)?;
    TodoList::open(store)
}

/// Print an outcome and turn a failed one into an error.
fn report(outcome: &Outcome, todo: Option<&Todo>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome_to_json(outcome, todo))?
        );
    }
    match outcome {
        Outcome::Applied(n) => {
            if !json {
                println!("{}", format_notification(n));
            }
            Ok(())
        }
        Outcome::Unchanged => {
            if !json {
                println!("Nothing to change.");
            }
            Ok(())
        }
        Outcome::Failed(n) => Err(Box::new(CliError::Failed {
            title: n.title.clone(),
            description: n.description.clone(),
        })),
    }
}

fn joined_text(words: &[String]) -> Result<String, CliError> {
    let text = words.join(" ");
    normalize_text(&text).ok_or(CliError::BlankText)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter: FilterType = args.filter.parse().map_err(CliError::from)?;
    let list = open_list(home, config)?;
    let visible = view::filter_todos(list.todos(), filter);

    if json {
        let out: Vec<TodoJson> = visible.iter().map(|t| todo_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if visible.is_empty() {
        let (heading, hint) = view::empty_message(filter);
        println!("{}. {}", heading, hint);
        return Ok(());
    }
    for todo in visible {
        println!("{}", format_todo_line(todo));
    }
    Ok(())
}

fn cmd_stats(home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let list = open_list(home, config)?;
    let counts = view::counts(list.todos());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(&counts))?);
    } else {
        for line in format_stats(&counts) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = joined_text(&args.text)?;
    let mut list = open_list(home, config)?;
    let outcome = list.dispatch(Command::Add(text));
    let added = match outcome {
        Outcome::Applied(_) => list.todos().first(),
        _ => None,
    };
    report(&outcome, added, json)
}

fn cmd_toggle(args: IdArg, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut list = open_list(home, config)?;
    let id = list.resolve_id(&args.id)?;
    let outcome = list.dispatch(Command::Toggle(id.clone()));
    report(&outcome, list.get(&id), json)
}

fn cmd_edit(args: EditArgs, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = joined_text(&args.text)?;
    let mut list = open_list(home, config)?;
    let id: TodoId = list.resolve_id(&args.id)?;
    let outcome = list.dispatch(Command::Edit(id.clone(), text));
    report(&outcome, list.get(&id), json)
}

fn cmd_delete(args: IdArg, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut list = open_list(home, config)?;
    let id = list.resolve_id(&args.id)?;
    let outcome = list.dispatch(Command::Delete(id));
    report(&outcome, None, json)
}

/// Clear-completed and complete-all
fn cmd_bulk(command: Command, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut list = open_list(home, config)?;
    let outcome = list.dispatch(command);
    report(&outcome, None, json)
}
