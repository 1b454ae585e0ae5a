//! CLI module providing the standalone runner
//!
//! Parses arguments, sets up logging, and routes commands to
//! [`CommandHandler`].

pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

pub use commands::{Cli, Commands, StatusArg};
pub use context::CliContext;
pub use handlers::CommandHandler;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
        let context = CliContext::new(&cli, runtime.handle().clone());

        // Held for the process lifetime so buffered file logs are flushed
        let _log_guard = context.init_logging()?;

        let handler = CommandHandler::new(context);
        let result = handler.handle_command(cli.command);

        runtime.shutdown_timeout(Duration::from_secs(1));
        result
    }
}
