//! Common test utilities and helpers
//!
//! Provides an in-memory host with a manual task queue and a transport that
//! records every POST instead of touching the network.

#![allow(dead_code)]

use connect_notify::errors::{NotifyError, NotifyResult};
use connect_notify::host::{AsyncTask, Host};
use connect_notify::webhook::{WebhookSender, WebhookTransport};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;

pub const WEBHOOK_A: &str = "https://discord.com/api/webhooks/111/aaa";
pub const WEBHOOK_B: &str = "https://discord.com/api/webhooks/222/bbb";
pub const WEBHOOK_C: &str = "https://discord.com/api/webhooks/333/ccc";

/// Host whose async tasks wait in a queue until the test runs them
pub struct QueuedHost {
    data_folder: PathBuf,
    tasks: Mutex<Vec<AsyncTask>>,
    pub online_players: u32,
    pub max_players: u32,
}

impl QueuedHost {
    pub fn new(data_folder: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            data_folder: data_folder.into(),
            tasks: Mutex::new(Vec::new()),
            online_players: 3,
            max_players: 20,
        })
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs every queued task on the current thread, returns how many ran
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<AsyncTask> = std::mem::take(&mut *self.tasks.lock().unwrap());
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl Host for QueuedHost {
    fn platform_name(&self) -> String {
        "TestPlatform".to_string()
    }

    fn data_folder(&self) -> PathBuf {
        self.data_folder.clone()
    }

    fn run_async(&self, task: AsyncTask) {
        self.tasks.lock().unwrap().push(task);
    }

    fn online_player_count(&self) -> u32 {
        self.online_players
    }

    fn max_player_count(&self) -> u32 {
        self.max_players
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    pub fn description(&self) -> &str {
        self.body["embeds"][0]["description"].as_str().unwrap_or_default()
    }
}

/// Transport that records requests and answers with canned statuses
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    statuses: Mutex<HashMap<String, u16>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, url: &str, status: u16) {
        self.statuses.lock().unwrap().insert(url.to_string(), status);
    }

    pub fn fail_for(&self, url: &str) {
        self.failing.lock().unwrap().push(url.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl WebhookTransport for RecordingTransport {
    fn post_json(&self, url: &Url, body: Vec<u8>) -> NotifyResult<u16> {
        let url = url.to_string();
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.clone(),
            body: serde_json::from_slice(&body)?,
        });

        if self.failing.lock().unwrap().contains(&url) {
            return Err(NotifyError::Timeout {
                origin: "https://discord.com".to_string(),
                timeout_secs: 10,
                cause: "operation timed out".to_string(),
                source: None,
            });
        }
        Ok(*self.statuses.lock().unwrap().get(&url).unwrap_or(&204))
    }
}

pub fn sender_for(transport: &Arc<RecordingTransport>) -> WebhookSender {
    WebhookSender::new(transport.clone())
}

/// Plugins folder layout: `<tmp>/plugins/{connect-notify,connect}`
pub struct PluginsDir {
    pub temp: TempDir,
}

impl PluginsDir {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn plugins(&self) -> PathBuf {
        self.temp.path().join("plugins")
    }

    pub fn data_folder(&self) -> PathBuf {
        self.plugins().join("connect-notify")
    }

    pub fn write_notify_config(&self, content: &str) {
        write_file(&self.data_folder().join("config.yml"), content);
    }

    pub fn write_connect_config(&self, content: &str) {
        write_file(&self.plugins().join("connect").join("config.yml"), content);
    }
}

pub fn webhooks_config(urls: &[&str], online: bool, offline: bool) -> String {
    let mut content = String::from("discord:\n  webhooks:\n");
    for url in urls {
        content.push_str(&format!("    - '{url}'\n"));
    }
    content.push_str(&format!(
        "messages:\n  online:\n    enabled: {online}\n  offline:\n    enabled: {offline}\n"
    ));
    content
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Log sink shared between a `tracing` subscriber and the test body
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Runs `f` with every event at TRACE and above written to this buffer
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }
}
