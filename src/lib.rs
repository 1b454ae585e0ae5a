//! Connect Notify Library
//!
//! Sends Discord webhook notifications when a Minecraft server starts or
//! stops, including the Minekube Connect endpoint players join with.
//! Host platforms plug in through the [`host::Host`] trait.

pub mod cli;
pub mod config;
pub mod connect;
pub mod errors;
pub mod host;
pub mod notify;
pub mod placeholders;
pub mod standalone;
pub mod webhook;

// Re-export commonly used types for convenience
pub use config::{NotifyConfig, NotifyDefaults};
pub use connect::{ConnectConfigReader, ResolvedIdentity};
pub use errors::{NotifyError, NotifyResult};
pub use host::Host;
pub use notify::{ConnectNotify, LifecycleState, NotifySession};
pub use webhook::{DeliveryOutcome, WebhookSender};
