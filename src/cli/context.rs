//! CLI Context for shared settings and host construction
//!
//! Centralizes the global arguments so handlers only deal with their own
//! command's options.

use crate::standalone::StandaloneHost;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing_appender::non_blocking::WorkerGuard;

use super::Cli;

/// CLI execution context containing shared dependencies and configuration
#[derive(Clone)]
pub struct CliContext {
    pub data_dir: PathBuf,
    pub plugins_dir: Option<PathBuf>,
    pub platform_name: String,
    pub max_players: u32,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    handle: Handle,
}

impl CliContext {
    pub fn new(cli: &Cli, handle: Handle) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            plugins_dir: cli.plugins_dir.clone(),
            platform_name: cli.platform_name.clone(),
            max_players: cli.max_players,
            log_file: cli.log_file.clone(),
            verbose: cli.verbose,
            handle,
        }
    }

    /// Builds the standalone host described by the global arguments
    pub fn host(&self) -> Arc<StandaloneHost> {
        let mut host = StandaloneHost::new(
            self.handle.clone(),
            &self.data_dir,
            self.platform_name.clone(),
            self.max_players,
        );
        if let Some(plugins_dir) = &self.plugins_dir {
            host = host.with_plugins_folder(plugins_dir.clone());
        }
        Arc::new(host)
    }

    /// Initialize logging subsystem based on verbosity and the optional log file
    ///
    /// The returned guard must outlive all logging when a file is configured.
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let log_level = if self.verbose { "debug" } else { "info" };
        let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
            log_level
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

        let Some(log_path) = &self.log_file else {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter)
                .init();
            return Ok(None);
        };

        use tracing_subscriber::prelude::*;

        let directory = log_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        std::fs::create_dir_all(directory).context("Failed to create log directory")?;

        let file_appender = tracing_appender::rolling::never(
            directory,
            log_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("connect-notify.log")),
        );
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::debug!("Logging to {}", log_path.display());
        Ok(Some(guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_context_from_args() {
        let cli = Cli::parse_from([
            "connect-notify",
            "--data-dir",
            "/srv/plugins/connect-notify",
            "--max-players",
            "64",
            "check",
        ]);
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let context = CliContext::new(&cli, runtime.handle().clone());

        assert_eq!(context.max_players, 64);
        assert_eq!(context.platform_name, "Standalone");

        let host = context.host();
        use crate::host::Host;
        assert_eq!(host.plugins_folder(), PathBuf::from("/srv/plugins"));
        assert_eq!(host.max_player_count(), 64);
    }
}
