use std::io;

use autostream_core::config::{LogFormat, LoggingConfig};
use tracing::{debug, Level};

/// Installs the global subscriber on stderr; stdout carries the conversation.
/// Returns `false` when a subscriber was already installed, which keeps it.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let log_level = config.level.trim().parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(io::stderr);

    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match result {
        Ok(()) => true,
        Err(error) => {
            debug!(
                event_name = "system.logging.already_initialized",
                correlation_id = "bootstrap",
                error = %error,
                "global subscriber already installed; keeping it"
            );
            false
        }
    }
}
