pub mod config;
pub mod notification;
pub mod todo;

pub use config::*;
pub use notification::*;
pub use todo::*;
