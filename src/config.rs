use crate::errors::{NotifyError, NotifyResult};
use serde::Serialize;
use serde_yaml::Value;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Default configuration document shipped with the plugin
pub const BUNDLED_CONFIG: &str = include_str!("../resources/config.yml");

/// Webhook entry written into the default config; never a real endpoint
pub const PLACEHOLDER_WEBHOOK: &str = "https://discord.com/api/webhooks/...";

/// Marker left in example URLs by older templates
const PLACEHOLDER_MARKER: &str = "...";

/// Settings for one kind of notification (online or offline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessageSettings {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub color: String,
    pub show_endpoint: bool,
    pub endpoint_text: String,
}

/// Hard-coded defaults applied before the YAML file is read
///
/// Constructed once and handed to [`NotifyConfig::new`]; every key missing
/// from the file, or present with the wrong type, takes its value from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyDefaults {
    pub file_name: String,
    pub username: String,
    pub avatar_url: String,
    pub placeholder_webhook: String,
    pub online: MessageSettings,
    pub offline: MessageSettings,
}

impl Default for NotifyDefaults {
    fn default() -> Self {
        Self {
            file_name: "config.yml".to_string(),
            username: "Connect Notify".to_string(),
            avatar_url: "https://connect.minekube.com/img/logo.png".to_string(),
            placeholder_webhook: PLACEHOLDER_WEBHOOK.to_string(),
            online: MessageSettings {
                enabled: true,
                title: "Server Online! 🟢".to_string(),
                description: "**{server-name}** is now up and running.".to_string(),
                color: "#57F287".to_string(),
                show_endpoint: true,
                endpoint_text: "Connect with: `{endpoint}`".to_string(),
            },
            offline: MessageSettings {
                enabled: true,
                title: "Server Offline 🔴".to_string(),
                description: "**{server-name}** has been shut down.".to_string(),
                color: "#ED4245".to_string(),
                show_endpoint: false,
                endpoint_text: String::new(),
            },
        }
    }
}

impl NotifyDefaults {
    /// Renders a complete config document from these defaults
    ///
    /// Used when no bundled template is available to copy.
    pub fn render_document(&self) -> NotifyResult<String> {
        #[derive(Serialize)]
        #[serde(rename_all = "kebab-case")]
        struct Discord<'a> {
            webhooks: Vec<&'a str>,
            username: &'a str,
            avatar_url: &'a str,
        }

        #[derive(Serialize)]
        struct Messages<'a> {
            online: &'a MessageSettings,
            offline: &'a MessageSettings,
        }

        #[derive(Serialize)]
        struct Document<'a> {
            discord: Discord<'a>,
            messages: Messages<'a>,
        }

        let document = Document {
            discord: Discord {
                webhooks: vec![self.placeholder_webhook.as_str()],
                username: &self.username,
                avatar_url: &self.avatar_url,
            },
            messages: Messages {
                online: &self.online,
                offline: &self.offline,
            },
        };

        let body = serde_yaml::to_string(&document)
            .map_err(|e| NotifyError::config_with_source("Failed to render default config", e))?;
        Ok(format!("# Connect Notify Configuration\n{body}"))
    }
}

/// Configuration for the notifier, read from `<data folder>/config.yml`
///
/// Loading never fails from the caller's point of view: problems are logged
/// and the defaults stay in place. An unedited default file yields zero
/// active webhooks, which keeps the notifier inert until configured.
///
/// # Example
///
/// ```rust,no_run
/// use connect_notify::config::{NotifyConfig, NotifyDefaults};
///
/// let mut config = NotifyConfig::new("plugins/connect-notify", NotifyDefaults::default());
/// config.load();
///
/// if config.has_webhooks() {
///     println!("Notifying {} webhook(s)", config.webhook_urls().len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    config_path: PathBuf,
    defaults: NotifyDefaults,
    template: Option<Cow<'static, str>>,

    webhook_urls: Vec<String>,
    username: String,
    avatar_url: String,
    online: MessageSettings,
    offline: MessageSettings,
}

impl NotifyConfig {
    /// Creates a configuration rooted at the plugin's data folder
    ///
    /// The bundled template is used for first-run file creation; see
    /// [`with_template`](Self::with_template) to override it.
    pub fn new(data_folder: impl AsRef<Path>, defaults: NotifyDefaults) -> Self {
        let config_path = data_folder.as_ref().join(&defaults.file_name);
        Self {
            config_path,
            template: Some(Cow::Borrowed(BUNDLED_CONFIG)),
            webhook_urls: Vec::new(),
            username: defaults.username.clone(),
            avatar_url: defaults.avatar_url.clone(),
            online: defaults.online.clone(),
            offline: defaults.offline.clone(),
            defaults,
        }
    }

    /// Sets the document copied on first run
    ///
    /// `None` makes [`load`](Self::load) write a document rendered from the
    /// defaults record instead.
    pub fn with_template(mut self, template: Option<Cow<'static, str>>) -> Self {
        self.template = template;
        self
    }

    /// Loads the configuration file, writing the default document first if absent
    ///
    /// Safe to call more than once; each call starts again from the defaults.
    pub fn load(&mut self) {
        self.reset();

        if !self.config_path.exists() {
            if let Err(e) = self.save_default() {
                error!(category = e.category(), "Failed to save default config: {}", e);
            }
        }

        match self.read_document() {
            Ok(document) => self.apply(&document),
            Err(e) => error!(category = e.category(), "Failed to load config: {}", e),
        }
    }

    /// Writes the default document if no config file exists yet
    ///
    /// Returns `true` when a file was written.
    pub fn save_default(&self) -> NotifyResult<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.write_default()?;
        Ok(true)
    }

    /// Overwrites the config file with the default document
    pub fn write_default(&self) -> NotifyResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| NotifyError::io_with_source(parent, "create data folder", e))?;
        }

        let content = match &self.template {
            Some(template) => template.clone().into_owned(),
            None => self.defaults.render_document()?,
        };

        fs::write(&self.config_path, content)
            .map_err(|e| NotifyError::io_with_source(&self.config_path, "write default config", e))?;
        info!("Created default config at {}", self.config_path.display());
        Ok(())
    }

    fn reset(&mut self) {
        self.webhook_urls.clear();
        self.username = self.defaults.username.clone();
        self.avatar_url = self.defaults.avatar_url.clone();
        self.online = self.defaults.online.clone();
        self.offline = self.defaults.offline.clone();
    }

    fn read_document(&self) -> NotifyResult<Value> {
        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| NotifyError::io_with_source(&self.config_path, "read config file", e))?;
        serde_yaml::from_str(&content).map_err(|e| NotifyError::yaml_with_source(&self.config_path, e))
    }

    fn apply(&mut self, document: &Value) {
        let discord = document.get("discord");

        if let Some(webhooks) = child(discord, "webhooks").and_then(Value::as_sequence) {
            self.webhook_urls = webhooks
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|url| !self.is_placeholder(url))
                .map(str::to_string)
                .collect();
        }
        self.username = get_string(discord, "username", &self.defaults.username);
        self.avatar_url = get_string(discord, "avatar-url", &self.defaults.avatar_url);

        let messages = document.get("messages");
        // Simple schema: `notifications: { online: bool, offline: bool }`
        let toggles = document.get("notifications");

        self.online = read_message(child(messages, "online"), child(toggles, "online"), &self.defaults.online);
        self.offline = read_message(child(messages, "offline"), child(toggles, "offline"), &self.defaults.offline);

        debug!(
            "Loaded config from {} with {} webhook(s)",
            self.config_path.display(),
            self.webhook_urls.len()
        );
    }

    fn is_placeholder(&self, url: &str) -> bool {
        url.is_empty() || url == self.defaults.placeholder_webhook || url.contains(PLACEHOLDER_MARKER)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn webhook_urls(&self) -> &[String] {
        &self.webhook_urls
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn online(&self) -> &MessageSettings {
        &self.online
    }

    pub fn offline(&self) -> &MessageSettings {
        &self.offline
    }

    pub fn is_online_enabled(&self) -> bool {
        self.online.enabled
    }

    pub fn is_offline_enabled(&self) -> bool {
        self.offline.enabled
    }

    /// True when at least one real webhook URL is configured
    pub fn has_webhooks(&self) -> bool {
        !self.webhook_urls.is_empty()
    }
}

fn child<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent.and_then(|value| value.get(key))
}

fn get_string(section: Option<&Value>, key: &str, default: &str) -> String {
    child(section, key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn get_bool(section: Option<&Value>, key: &str) -> Option<bool> {
    child(section, key).and_then(Value::as_bool)
}

fn read_message(
    section: Option<&Value>,
    legacy_toggle: Option<&Value>,
    defaults: &MessageSettings,
) -> MessageSettings {
    let enabled = get_bool(section, "enabled")
        .or_else(|| legacy_toggle.and_then(Value::as_bool))
        .unwrap_or(defaults.enabled);

    MessageSettings {
        enabled,
        title: get_string(section, "title", &defaults.title),
        description: get_string(section, "description", &defaults.description),
        color: get_string(section, "color", &defaults.color),
        show_endpoint: get_bool(section, "show-endpoint").unwrap_or(defaults.show_endpoint),
        endpoint_text: get_string(section, "endpoint-text", &defaults.endpoint_text),
    }
}
