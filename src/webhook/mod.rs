//! Discord webhook sender
//!
//! Builds a single-embed payload and delivers it with one POST per webhook
//! URL. Sending is fire-and-forget: every failure ends in a log line and a
//! [`DeliveryOutcome`], never an error returned to the caller.
//!
//! ## Status handling
//!
//! - **200 / 204**: delivered, logged at debug
//! - **429**: rate limited, logged at warn; not retried
//! - **anything else**: logged at warn with the raw status code
//! - **transport errors** (connect failure, timeout): logged at warn

pub mod embed;
pub mod transport;

use crate::config::MessageSettings;
use crate::errors::{NotifyError, NotifyResult};
use crate::placeholders::Placeholders;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedPayload};
pub use transport::{HttpTransport, WebhookTransport};

pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const USER_AGENT: &str = concat!("connect-notify/", env!("CARGO_PKG_VERSION"));

/// Color used for plain embeds when the configured hex is unusable
pub const DEFAULT_COLOR: u32 = 0x00ff00;
/// Color used for status embeds when the configured hex is unusable
pub const STATUS_DEFAULT_COLOR: u32 = 0x57f287;

const CONNECT_URL: &str = "https://connect.minekube.com";
const FOOTER_TEXT: &str = "Minekube Connect";

/// Parses `#RRGGBB` or `RRGGBB` into Discord's integer color
///
/// Returns `default` for empty, non-hex, or out-of-range input.
pub fn parse_color(hex: &str, default: u32) -> u32 {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return default;
    }

    u32::from_str_radix(digits, 16).unwrap_or(default)
}

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    RateLimited,
    Rejected(u16),
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    fn from_status(status: u16) -> Self {
        match status {
            200 | 204 => Self::Delivered,
            429 => Self::RateLimited,
            other => Self::Rejected(other),
        }
    }
}

/// Server state reported by a status embed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Online,
    Offline,
}

impl ServerStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Online => "🟢 Online",
            Self::Offline => "🔴 Offline",
        }
    }
}

/// Inputs for an online/offline status embed
#[derive(Debug, Clone)]
pub struct StatusEmbed<'a> {
    pub settings: &'a MessageSettings,
    pub placeholders: &'a Placeholders,
    pub username: &'a str,
    pub avatar_url: &'a str,
}

impl StatusEmbed<'_> {
    /// Builds the rich embed: author block, templated description, three
    /// inline fields and the fixed footer
    pub fn build(&self, status: ServerStatus) -> Embed {
        let placeholders = self.placeholders;
        let mut description = placeholders.apply(&self.settings.description);
        if self.settings.show_endpoint && !self.settings.endpoint_text.is_empty() {
            description.push_str("\n\n");
            description.push_str(&placeholders.apply(&self.settings.endpoint_text));
        }

        let players = match status {
            ServerStatus::Online => format!("{}/{}", placeholders.players, placeholders.max_players),
            ServerStatus::Offline => format!("0/{}", placeholders.max_players),
        };
        let ping = match status {
            ServerStatus::Online => placeholders.apply("`{endpoint}`"),
            ServerStatus::Offline => "Unreachable".to_string(),
        };

        Embed {
            title: Some(placeholders.apply(&self.settings.title)).filter(|t| !t.is_empty()),
            author: Some(EmbedAuthor {
                name: placeholders.apply("{server-name}"),
                icon_url: Some(self.avatar_url.to_string()).filter(|u| !u.is_empty()),
                url: Some(CONNECT_URL.to_string()),
            }),
            description,
            color: parse_color(&self.settings.color, STATUS_DEFAULT_COLOR),
            fields: vec![
                EmbedField::inline("Status", status.label()),
                EmbedField::inline("Players", players),
                EmbedField::inline("Ping", ping),
            ],
            footer: Some(EmbedFooter {
                text: FOOTER_TEXT.to_string(),
            }),
            timestamp: now_timestamp(),
        }
    }

    fn payload(&self, status: ServerStatus) -> EmbedPayload {
        EmbedPayload::new(Some(self.username), Some(self.avatar_url)).with_embed(self.build(status))
    }
}

/// Sends Discord webhook messages through a [`WebhookTransport`]
#[derive(Clone)]
pub struct WebhookSender {
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookSender {
    pub fn new(transport: Arc<dyn WebhookTransport>) -> Self {
        Self { transport }
    }

    /// Creates a sender backed by the blocking HTTP transport
    pub fn http() -> NotifyResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new()?)))
    }

    /// Sends a plain embed with a title, description and optional footer
    #[allow(clippy::too_many_arguments)]
    pub fn send_embed(
        &self,
        webhook_url: &str,
        title: &str,
        description: &str,
        color_hex: &str,
        footer_text: Option<&str>,
        username: Option<&str>,
        avatar_url: Option<&str>,
    ) -> DeliveryOutcome {
        let embed = Embed {
            title: Some(title.to_string()),
            description: description.to_string(),
            color: parse_color(color_hex, DEFAULT_COLOR),
            footer: footer_text
                .filter(|text| !text.is_empty())
                .map(|text| EmbedFooter { text: text.to_string() }),
            timestamp: now_timestamp(),
            ..Default::default()
        };

        self.deliver(webhook_url, &EmbedPayload::new(username, avatar_url).with_embed(embed))
    }

    /// Sends a plain text message without an embed
    pub fn send_message(
        &self,
        webhook_url: &str,
        content: &str,
        username: Option<&str>,
        avatar_url: Option<&str>,
    ) -> DeliveryOutcome {
        self.deliver(webhook_url, &EmbedPayload::new(username, avatar_url).with_content(content))
    }

    pub fn send_online_embed(&self, webhook_url: &str, embed: &StatusEmbed<'_>) -> DeliveryOutcome {
        self.deliver(webhook_url, &embed.payload(ServerStatus::Online))
    }

    pub fn send_offline_embed(&self, webhook_url: &str, embed: &StatusEmbed<'_>) -> DeliveryOutcome {
        self.deliver(webhook_url, &embed.payload(ServerStatus::Offline))
    }

    /// Serializes and POSTs the payload, mapping every failure to a log line
    pub fn deliver(&self, webhook_url: &str, payload: &EmbedPayload) -> DeliveryOutcome {
        match self.try_deliver(webhook_url, payload) {
            Ok(status) => {
                let outcome = DeliveryOutcome::from_status(status);
                match &outcome {
                    DeliveryOutcome::Delivered => debug!("Discord webhook sent successfully"),
                    DeliveryOutcome::RateLimited => {
                        warn!("Discord webhook rate limited. Message may be delayed.")
                    }
                    DeliveryOutcome::Rejected(code) => {
                        warn!("Discord webhook returned status code: {}", code)
                    }
                    DeliveryOutcome::Failed(_) => {}
                }
                outcome
            }
            Err(e) => {
                warn!(category = e.category(), "Failed to send Discord webhook: {}", e);
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }

    fn try_deliver(&self, webhook_url: &str, payload: &EmbedPayload) -> NotifyResult<u16> {
        let url = Url::parse(webhook_url).map_err(NotifyError::invalid_url)?;
        let body = serde_json::to_vec(payload)?;
        self.transport.post_json(&url, body)
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
