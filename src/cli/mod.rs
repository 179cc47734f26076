//! CLI entry point for Courier.

use clap::{Args, Parser, Subcommand};

/// Courier gateway CLI
#[derive(Parser, Debug)]
#[command(name = "courier", version, about = "Courier conversational-agent gateway CLI")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start (or resume) a conversation thread for a user
    Start(StartArgs),
    /// Send a message on a thread and print the new run id
    Chat(ChatArgs),
    /// Drive a run to completion and print the outcome
    Check(CheckArgs),
    /// Start a conversation, send one message and wait for the reply
    Ask(AskArgs),
    /// Print the advertised tool descriptors as JSON
    Tools,
}

/// Identity of the user a thread belongs to.
#[derive(Args, Debug, Clone, Default)]
pub struct UserArgs {
    /// Platform the user writes from (web, whatsapp, ...)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Username on that platform
    #[arg(short, long)]
    pub username: Option<String>,
}

/// Arguments for `courier start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub user: UserArgs,
}

/// Arguments for `courier chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Thread id returned by `courier start`
    #[arg(short, long)]
    pub thread: String,

    /// Message text
    pub message: String,
}

/// Arguments for `courier check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(short, long)]
    pub thread: String,

    #[arg(short, long)]
    pub run: String,
}

/// Arguments for `courier ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Message text
    pub message: String,
}
