//! HTTP transport for webhook delivery

use super::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::errors::NotifyResult;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

/// Performs one POST of a JSON body and reports the HTTP status code
///
/// Implementations block the calling thread until the response arrives or a
/// timeout fires. A non-2xx status is not an error at this layer.
pub trait WebhookTransport: Send + Sync {
    fn post_json(&self, url: &Url, body: Vec<u8>) -> NotifyResult<u16>;
}

/// Blocking reqwest transport with fixed timeouts and user agent
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> NotifyResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl WebhookTransport for HttpTransport {
    fn post_json(&self, url: &Url, body: Vec<u8>) -> NotifyResult<u16> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()?;

        Ok(response.status().as_u16())
    }
}
