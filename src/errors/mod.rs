//! Centralized error handling module
//!
//! Typed errors for the notification pipeline. They stay inside the crate:
//! lifecycle hooks turn them into log lines.

pub mod types;

pub use types::{NotifyError, NotifyResult};
