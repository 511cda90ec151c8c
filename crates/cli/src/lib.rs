pub mod bootstrap;
pub mod capture;
pub mod commands;
pub mod logging;
pub mod session;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::commands::chat::ChatArgs;

#[derive(Debug, Parser)]
#[command(
    name = "autostream",
    about = "AutoStream sales assistant",
    long_about = "Chat with the AutoStream sales assistant, inspect its configuration, and check runtime readiness.",
    after_help = "Examples:\n  autostream\n  autostream chat --knowledge rag_knowledge.json\n  autostream doctor --json\n  autostream config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session on stdin/stdout (default)")]
    Chat(ChatArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, the knowledge document, and fallback LLM readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or_else(|| Command::Chat(ChatArgs::default())) {
        Command::Chat(args) => commands::chat::run(args),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
