//! Host implementation for running outside a plugin platform
//!
//! Backs [`Host::run_async`] with a tokio blocking pool. The runtime itself is
//! owned by the caller; the host only keeps a [`Handle`] so that dropping the
//! host from inside a task never tears the runtime down.

use crate::host::{AsyncTask, Host};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct StandaloneHost {
    data_folder: PathBuf,
    plugins_folder: Option<PathBuf>,
    platform_name: String,
    online_players: u32,
    max_players: u32,
    handle: Handle,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl StandaloneHost {
    pub fn new(
        handle: Handle,
        data_folder: impl AsRef<Path>,
        platform_name: impl Into<String>,
        max_players: u32,
    ) -> Self {
        Self {
            data_folder: data_folder.as_ref().to_path_buf(),
            plugins_folder: None,
            platform_name: platform_name.into(),
            online_players: 0,
            max_players,
            handle,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the plugins folder instead of using the data folder's parent
    pub fn with_plugins_folder(mut self, plugins_folder: impl Into<PathBuf>) -> Self {
        self.plugins_folder = Some(plugins_folder.into());
        self
    }

    pub fn with_online_players(mut self, online_players: u32) -> Self {
        self.online_players = online_players;
        self
    }

    /// Waits for tasks started with `run_async`, up to `timeout`
    ///
    /// Returns `false` if some task was still running when the timeout hit.
    pub fn wait_for_tasks(&self, timeout: Duration) -> bool {
        let handles: Vec<JoinHandle<()>> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return false,
        };
        if handles.is_empty() {
            return true;
        }

        debug!("Waiting for {} background task(s)", handles.len());
        let finished = self.handle.block_on(async move {
            tokio::time::timeout(timeout, async move {
                for handle in handles {
                    if let Err(e) = handle.await {
                        warn!("Background task failed: {}", e);
                    }
                }
            })
            .await
        });

        finished.is_ok()
    }
}

impl Host for StandaloneHost {
    fn platform_name(&self) -> String {
        self.platform_name.clone()
    }

    fn data_folder(&self) -> PathBuf {
        self.data_folder.clone()
    }

    fn plugins_folder(&self) -> PathBuf {
        match &self.plugins_folder {
            Some(folder) => folder.clone(),
            None => self
                .data_folder
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.data_folder.clone()),
        }
    }

    fn run_async(&self, task: AsyncTask) {
        let join = self.handle.spawn_blocking(task);
        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|handle| !handle.is_finished());
            pending.push(join);
        }
    }

    fn online_player_count(&self) -> u32 {
        self.online_players
    }

    fn max_player_count(&self) -> u32 {
        self.max_players
    }
}
