//! Command handlers for all CLI operations
//!
//! Keeps CLI parsing separate from the notification pipeline: handlers only
//! wire a [`StandaloneHost`](crate::standalone::StandaloneHost) into the
//! library types.

use super::{CliContext, Commands, StatusArg};
use crate::config::{NotifyConfig, NotifyDefaults};
use crate::host::Host;
use crate::notify::{ConnectNotify, NotifySession};
use crate::webhook::{ServerStatus, WebhookSender, REQUEST_TIMEOUT_SECS};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Coordinates all command handling operations
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { force } => self.handle_init(force),
            Commands::Check => self.handle_check(),
            Commands::Notify { status } => self.handle_notify(status),
            Commands::Run => self.handle_run(),
        }
    }

    fn handle_init(&self, force: bool) -> Result<()> {
        let config = NotifyConfig::new(&self.context.data_dir, NotifyDefaults::default());

        if force {
            config.write_default().context("Failed to write default config")?;
            println!("Configuration written to {}", config.config_path().display());
        } else if config.save_default().context("Failed to write default config")? {
            println!("Configuration written to {}", config.config_path().display());
        } else {
            println!(
                "Configuration already exists at {} (use --force to overwrite)",
                config.config_path().display()
            );
        }

        Ok(())
    }

    fn handle_check(&self) -> Result<()> {
        let host = self.context.host();
        let config = NotifySession::load_config(host.as_ref(), NotifyDefaults::default());
        if !config.has_webhooks() {
            println!("No webhooks configured in {}", config.config_path().display());
            return Ok(());
        }
        let session = NotifySession::resolve(host.as_ref(), config);

        let config = session.config();
        println!("Config: {}", config.config_path().display());
        println!("Webhooks: {}", config.webhook_urls().len());
        println!("Bot username: {}", config.username());
        println!("Online notification: {}", enabled_label(config.is_online_enabled()));
        println!("Offline notification: {}", enabled_label(config.is_offline_enabled()));
        println!("Plugins folder: {}", host.plugins_folder().display());
        println!("Endpoint: {}", session.identity().endpoint);
        println!("Server name: {}", session.identity().server_name);

        Ok(())
    }

    fn handle_notify(&self, status: StatusArg) -> Result<()> {
        let host = self.context.host();
        let Some(session) = NotifySession::open(host.as_ref(), NotifyDefaults::default()) else {
            println!("No webhooks configured, nothing sent");
            return Ok(());
        };

        let sender = WebhookSender::http()?;
        let outcomes = session.broadcast(&sender, host.as_ref(), ServerStatus::from(status));
        let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();

        println!("Delivered {}/{} notification(s)", delivered, outcomes.len());
        if delivered == 0 {
            anyhow::bail!("No webhook accepted the notification");
        }
        Ok(())
    }

    fn handle_run(&self) -> Result<()> {
        let host = self.context.host();
        let mut notifier = ConnectNotify::new(host.clone())?;

        let (shutdown_sender, shutdown_receiver) = flume::bounded::<()>(1);
        ctrlc::set_handler(move || {
            let _ = shutdown_sender.try_send(());
        })
        .context("Failed to install Ctrl+C handler")?;

        notifier.on_enable();
        info!("Running on {}, press Ctrl+C to stop", host.platform_name());

        if shutdown_receiver.recv().is_err() {
            warn!("Shutdown signal channel closed unexpectedly");
        }
        info!("Received Ctrl+C signal, stopping");

        if !host.wait_for_tasks(Duration::from_secs(REQUEST_TIMEOUT_SECS * 2)) {
            warn!("Online notification still in flight at shutdown");
        }
        notifier.on_disable();

        Ok(())
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
