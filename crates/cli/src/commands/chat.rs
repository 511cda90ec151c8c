use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use autostream_core::config::{ConfigOverrides, LoadOptions};
use clap::Args;
use tokio::io::BufReader;
use tracing::error;

use crate::bootstrap::{bootstrap_with_config, load_config, StartupError};
use crate::capture::ConsoleLeadCapture;
use crate::commands::CommandResult;
use crate::logging::init_logging;
use crate::session::run_session;

#[derive(Debug, Clone, Default, Args)]
pub struct ChatArgs {
    #[arg(long, value_name = "PATH", help = "Config file (defaults to autostream.toml or config/autostream.toml)")]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Knowledge document overriding knowledge.path")]
    pub knowledge: Option<PathBuf>,
    #[arg(long, value_name = "LEVEL", help = "Log level for stderr output (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,
}

impl ChatArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                knowledge_path: self.knowledge.clone(),
                log_level: self.log_level.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run(args: ChatArgs) -> CommandResult {
    match start(args) {
        Ok(result) => result,
        Err(error) => {
            CommandResult::failure("chat", error.error_class(), error.to_string(), error.exit_code())
        }
    }
}

fn start(args: ChatArgs) -> Result<CommandResult, StartupError> {
    let config = load_config(args.load_options())?;
    init_logging(&config.logging);

    let app = bootstrap_with_config(config, Arc::new(ConsoleLeadCapture))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    let history_capacity = app.config.conversation.history_capacity;
    let outcome = runtime.block_on(async {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = io::stdout();
        let shutdown = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        run_session(&app.controller, history_capacity, stdin, &mut stdout, shutdown).await
    });
    // Stdin is read on a blocking thread that may still be parked on a read.
    runtime.shutdown_background();

    match outcome {
        Ok(_) => Ok(CommandResult::silent()),
        Err(io_error) => {
            error!(event_name = "system.session.io_failed", error = %io_error, "chat session aborted");
            Ok(CommandResult::failure("chat", "session_io", io_error.to_string(), 4))
        }
    }
}
