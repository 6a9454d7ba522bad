use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklist v", env!("CARGO_PKG_VERSION"), " - a personal task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a todo
    Add(AddArgs),
    /// List todos
    #[command(alias = "ls")]
    List(ListArgs),
    /// Toggle a todo between active and completed
    Toggle(IdArg),
    /// Change a todo's text
    Edit(EditArgs),
    /// Delete a todo
    #[command(alias = "rm")]
    Delete(IdArg),
    /// Delete every completed todo
    ClearCompleted,
    /// Mark every active todo as completed
    CompleteAll,
    /// Show totals and progress
    Stats,
    /// Sign in to the remote backend
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which todos to show: all, active or completed
    #[arg(long, short, default_value = "all")]
    pub filter: String,
}

#[derive(Args)]
pub struct IdArg {
    /// Todo ID, or a unique prefix of one
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo ID, or a unique prefix of one
    pub id: String,
    /// New text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,
    /// Account password (falls back to $TASKLIST_PASSWORD, then a line on stdin)
    #[arg(long)]
    pub password: Option<String>,
}
