use clap::{Args, Parser, Subcommand};

/// Tabble - streaming chat client with persisted threads
#[derive(Parser, Debug)]
#[command(name = "tabble", version)]
pub struct Cli {
    /// Backend base URL, overrides config
    #[arg(long, env = "TABBLE_API__BASE_URL")]
    pub base_url: Option<String>,

    /// Owner of created threads, overrides config
    #[arg(long, env = "TABBLE_API__USER_ID")]
    pub user_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List threads
    Threads,
    /// Create a new thread and print its id
    New,
    /// Send a message and stream the reply
    Chat(ChatArgs),
    /// Print a thread's messages
    History(ThreadArgs),
    /// Rename a thread
    Rename(RenameArgs),
    /// Archive a thread
    Archive(ThreadArgs),
    /// Restore an archived thread
    Unarchive(ThreadArgs),
    /// Delete a thread (kept archived in the store)
    Delete(ThreadArgs),
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Thread to continue; a new thread is created when omitted
    #[arg(long)]
    pub thread: Option<String>,

    /// Do not register the thread with the store
    #[arg(long, conflicts_with = "thread")]
    pub local: bool,

    /// Message text
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Remote thread id
    pub thread: String,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    pub thread: String,
    pub title: String,
}
