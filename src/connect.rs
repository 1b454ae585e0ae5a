//! Reader for the Minekube Connect plugin configuration
//!
//! The Connect plugin owns `connect/config.yml` and its schema has moved
//! between releases, so keys are probed from an ordered candidate list.
//! Every read is best-effort: failures are logged and mapped to defaults.

use crate::errors::{NotifyError, NotifyResult};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Location of the Connect config relative to the plugins folder
pub const CONNECT_CONFIG_PATH: &str = "connect/config.yml";

pub const DEFAULT_ENDPOINT: &str = "unknown";
pub const DEFAULT_SERVER_NAME: &str = "Minecraft Server";

/// Key paths checked for the endpoint, first string match wins
const ENDPOINT_KEYS: &[&[&str]] = &[&["endpoint"], &["connect", "endpoint"], &["name"]];

/// Key paths checked for the server name
const SERVER_NAME_KEYS: &[&[&str]] = &[&["server-name"], &["serverName"]];

/// Endpoint and display name resolved once when the plugin is enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub endpoint: String,
    pub server_name: String,
}

impl Default for ResolvedIdentity {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

/// Read-only view of the companion plugin's configuration file
#[derive(Debug, Clone)]
pub struct ConnectConfigReader {
    config_path: PathBuf,
}

impl ConnectConfigReader {
    pub fn new(plugins_folder: impl AsRef<Path>) -> Self {
        Self {
            config_path: plugins_folder.as_ref().join(CONNECT_CONFIG_PATH),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the endpoint players connect with
    ///
    /// Returns `"unknown"` when the file is missing, unreadable, or has no
    /// usable endpoint key.
    pub fn read_endpoint(&self) -> String {
        if self.config_path.exists() {
            match self.probe(ENDPOINT_KEYS) {
                Ok(Some(endpoint)) if !endpoint.is_empty() => return endpoint,
                Ok(Some(_)) => {}
                Ok(None) => debug!(
                    "Connect config found at {} but no endpoint field found",
                    self.config_path.display()
                ),
                Err(e) => warn!(
                    category = e.category(),
                    "Failed to read Connect config at {}: {}",
                    self.config_path.display(),
                    e
                ),
            }
        }

        warn!(
            "Could not find Minekube Connect configuration at {}. \
             Make sure the Connect plugin is installed and configured.",
            self.config_path.display()
        );
        DEFAULT_ENDPOINT.to_string()
    }

    /// Reads the server display name, `"Minecraft Server"` when absent
    pub fn read_server_name(&self) -> String {
        match self.probe(SERVER_NAME_KEYS) {
            Ok(Some(name)) if !name.is_empty() => name,
            Ok(_) => DEFAULT_SERVER_NAME.to_string(),
            Err(e) => {
                debug!("Ignoring unreadable Connect config for server name: {}", e);
                DEFAULT_SERVER_NAME.to_string()
            }
        }
    }

    pub fn resolve(&self) -> ResolvedIdentity {
        ResolvedIdentity {
            endpoint: self.read_endpoint(),
            server_name: self.read_server_name(),
        }
    }

    fn probe(&self, candidates: &[&[&str]]) -> NotifyResult<Option<String>> {
        let document = self.load_document()?;
        Ok(candidates
            .iter()
            .find_map(|path| lookup_string(&document, path)))
    }

    fn load_document(&self) -> NotifyResult<Value> {
        if !self.config_path.exists() {
            return Err(NotifyError::ConfigNotFound {
                path: self.config_path.clone(),
            });
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| NotifyError::io_with_source(&self.config_path, "read Connect config", e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| NotifyError::yaml_with_source(&self.config_path, e))
    }
}

/// Walks nested mappings and returns the leaf only when it is a string
fn lookup_string(document: &Value, path: &[&str]) -> Option<String> {
    let mut current = document;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str().map(str::to_string)
}
