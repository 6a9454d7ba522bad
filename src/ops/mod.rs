pub mod command;
pub mod controller;
pub mod view;

pub use command::Command;
pub use controller::{LookupError, Outcome, TodoList};
