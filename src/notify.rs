//! Lifecycle orchestration shared by every host platform
//!
//! [`ConnectNotify`] is driven by the host's enable/disable hooks:
//!
//! - **enable**: load config, resolve the Connect endpoint once, and hand the
//!   online broadcast to [`Host::run_async`] so startup is not blocked
//! - **disable**: send the offline broadcast on the calling thread, since the
//!   host may exit before an async task gets to run
//!
//! Webhooks are notified in configuration order. A failed delivery never
//! stops the remaining ones.

use crate::config::{MessageSettings, NotifyConfig, NotifyDefaults};
use crate::connect::{ConnectConfigReader, ResolvedIdentity};
use crate::errors::NotifyResult;
use crate::host::Host;
use crate::placeholders::Placeholders;
use crate::webhook::{DeliveryOutcome, ServerStatus, StatusEmbed, WebhookSender};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

/// Loaded config plus the identity resolved at enable time
///
/// Immutable once built; shared with the async online task through an `Arc`.
#[derive(Debug, Clone)]
pub struct NotifySession {
    config: NotifyConfig,
    identity: ResolvedIdentity,
}

impl NotifySession {
    pub fn new(config: NotifyConfig, identity: ResolvedIdentity) -> Self {
        Self { config, identity }
    }

    /// Loads the plugin config from the host's data folder
    pub fn load_config<H: Host>(host: &H, defaults: NotifyDefaults) -> NotifyConfig {
        let mut config =
            NotifyConfig::new(host.data_folder(), defaults).with_template(host.bundled_config());
        config.load();
        config
    }

    /// Loads config and, when webhooks are configured, resolves the identity
    ///
    /// Returns `None` for an unconfigured install.
    pub fn open<H: Host>(host: &H, defaults: NotifyDefaults) -> Option<Self> {
        let config = Self::load_config(host, defaults);
        if !config.has_webhooks() {
            warn!(
                "No Discord webhooks configured! Please add webhook URLs to {}",
                config.config_path().display()
            );
            return None;
        }

        Some(Self::resolve(host, config))
    }

    /// Resolves the Connect identity for an already loaded config
    pub fn resolve<H: Host>(host: &H, config: NotifyConfig) -> Self {
        let identity = ConnectConfigReader::new(host.plugins_folder()).resolve();
        Self::new(config, identity)
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    pub fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }

    pub fn settings(&self, status: ServerStatus) -> &MessageSettings {
        match status {
            ServerStatus::Online => self.config.online(),
            ServerStatus::Offline => self.config.offline(),
        }
    }

    /// Sends one status embed to every configured webhook, in order
    pub fn broadcast<H: Host>(
        &self,
        sender: &WebhookSender,
        host: &H,
        status: ServerStatus,
    ) -> Vec<DeliveryOutcome> {
        let placeholders = Placeholders {
            endpoint: Some(self.identity.endpoint.clone()),
            server_name: Some(self.identity.server_name.clone()),
            players: host.online_player_count(),
            max_players: host.max_player_count(),
        };
        let embed = StatusEmbed {
            settings: self.settings(status),
            placeholders: &placeholders,
            username: self.config.username(),
            avatar_url: self.config.avatar_url(),
        };

        self.config
            .webhook_urls()
            .iter()
            .map(|url| match status {
                ServerStatus::Online => sender.send_online_embed(url, &embed),
                ServerStatus::Offline => sender.send_offline_embed(url, &embed),
            })
            .collect()
    }
}

/// Notification orchestrator driven by host lifecycle hooks
///
/// # Example
///
/// ```rust,no_run
/// use connect_notify::notify::ConnectNotify;
/// use connect_notify::standalone::StandaloneHost;
/// use std::sync::Arc;
///
/// fn main() -> anyhow::Result<()> {
///     let runtime = tokio::runtime::Runtime::new()?;
///     let host = Arc::new(StandaloneHost::new(
///         runtime.handle().clone(),
///         "plugins/connect-notify",
///         "Standalone",
///         20,
///     ));
///     let mut notifier = ConnectNotify::new(host)?;
///
///     notifier.on_enable();
///     // ... server runs ...
///     notifier.on_disable();
///     Ok(())
/// }
/// ```
pub struct ConnectNotify<H: Host> {
    host: Arc<H>,
    defaults: NotifyDefaults,
    sender: WebhookSender,
    state: LifecycleState,
    session: Option<Arc<NotifySession>>,
}

impl<H: Host> ConnectNotify<H> {
    /// Creates an orchestrator with default settings and the HTTP transport
    pub fn new(host: Arc<H>) -> NotifyResult<Self> {
        Ok(Self::with_sender(host, NotifyDefaults::default(), WebhookSender::http()?))
    }

    pub fn with_sender(host: Arc<H>, defaults: NotifyDefaults, sender: WebhookSender) -> Self {
        Self {
            host,
            defaults,
            sender,
            state: LifecycleState::Disabled,
            session: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Session built by the last enable, `None` when unconfigured or disabled
    pub fn session(&self) -> Option<&NotifySession> {
        self.session.as_deref()
    }

    /// Called by the host when the plugin is enabled / the server starts
    ///
    /// Enabling again starts from scratch: config is reloaded and the
    /// identity re-resolved.
    pub fn on_enable(&mut self) {
        self.state = LifecycleState::Enabling;
        self.session = None;

        if let Some(session) = NotifySession::open(self.host.as_ref(), self.defaults.clone()) {
            let session = Arc::new(session);

            info!("Connect Notify enabled on {}", self.host.platform_name());
            info!("Endpoint: {}", session.identity().endpoint);

            if session.config().is_online_enabled() {
                self.dispatch_online(Arc::clone(&session));
            }
            self.session = Some(session);
        }

        self.state = LifecycleState::Enabled;
    }

    /// Called by the host when the plugin is disabled / the server stops
    ///
    /// Blocks until every offline delivery has been attempted.
    pub fn on_disable(&mut self) {
        self.state = LifecycleState::Disabling;

        if let Some(session) = self.session.take() {
            if session.config().is_offline_enabled() {
                let outcomes = session.broadcast(&self.sender, self.host.as_ref(), ServerStatus::Offline);
                log_summary(ServerStatus::Offline, &outcomes);
            }
            info!("Connect Notify disabled");
        }

        self.state = LifecycleState::Disabled;
    }

    fn dispatch_online(&self, session: Arc<NotifySession>) {
        let host = Arc::clone(&self.host);
        let sender = self.sender.clone();

        self.host.run_async(Box::new(move || {
            let outcomes = session.broadcast(&sender, host.as_ref(), ServerStatus::Online);
            log_summary(ServerStatus::Online, &outcomes);
        }));
    }
}

fn log_summary(status: ServerStatus, outcomes: &[DeliveryOutcome]) {
    let kind = match status {
        ServerStatus::Online => "online",
        ServerStatus::Offline => "offline",
    };
    let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
    info!(
        "Sent {} notification to {} webhook(s) ({} delivered)",
        kind,
        outcomes.len(),
        delivered
    );
}
