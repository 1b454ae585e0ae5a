//! Capabilities a host platform provides to the notifier
//!
//! Bukkit, Velocity and BungeeCord adapters (or the bundled standalone
//! runner) implement [`Host`]; the core never sees a concrete host type.
//! Logging goes through `tracing`, so the host only has to install a
//! subscriber that forwards to its own log sink.

use crate::config::BUNDLED_CONFIG;
use std::borrow::Cow;
use std::path::PathBuf;

/// Unit of work handed to [`Host::run_async`]
pub type AsyncTask = Box<dyn FnOnce() + Send + 'static>;

pub trait Host: Send + Sync + 'static {
    /// Platform name shown in logs, e.g. "Paper" or "Velocity"
    fn platform_name(&self) -> String;

    /// Folder holding this plugin's `config.yml`
    fn data_folder(&self) -> PathBuf;

    /// Folder holding all plugins; defaults to the parent of the data folder
    fn plugins_folder(&self) -> PathBuf {
        let data_folder = self.data_folder();
        data_folder
            .parent()
            .map(|parent| parent.to_path_buf())
            .unwrap_or(data_folder)
    }

    /// Runs `task` off the calling thread on the host's scheduler
    fn run_async(&self, task: AsyncTask);

    fn online_player_count(&self) -> u32;

    fn max_player_count(&self) -> u32;

    /// Document copied into the data folder on first run
    ///
    /// Returning `None` makes the config loader render one from defaults.
    fn bundled_config(&self) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed(BUNDLED_CONFIG))
    }
}
