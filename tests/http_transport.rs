//! Exercises the real HTTP transport against a one-shot local server

mod common;

use common::LogCapture;

use connect_notify::webhook::{DeliveryOutcome, HttpTransport, WebhookSender};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

struct CapturedRequest {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

/// Accepts one connection, answers with `status`, and returns what was sent
fn serve_once(status_line: &'static str) -> (String, thread::JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/webhooks/1/token", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            headers.push(line);
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(stream, "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").unwrap();
        stream.flush().unwrap();

        CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    });

    (url, handle)
}

fn http_sender() -> WebhookSender {
    WebhookSender::new(Arc::new(HttpTransport::new().unwrap()))
}

fn has_header(request: &CapturedRequest, name: &str, value_prefix: &str) -> bool {
    request.headers.iter().any(|header| {
        let lower = header.to_ascii_lowercase();
        lower.starts_with(&format!("{name}:")) && lower[name.len() + 1..].trim().starts_with(value_prefix)
    })
}

#[test]
fn test_posts_json_embed() {
    let (url, server) = serve_once("204 No Content");

    let outcome = http_sender().send_embed(&url, "Title", "Body", "#ff0000", None, Some("Bot"), None);
    let request = server.join().unwrap();

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert_eq!(request.request_line, "POST /api/webhooks/1/token HTTP/1.1");
    assert!(has_header(&request, "content-type", "application/json"));
    assert!(has_header(&request, "user-agent", "connect-notify/"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["username"], "Bot");
    assert_eq!(body["embeds"][0]["color"], 0xff0000);
}

#[test]
fn test_rate_limited_status_reported() {
    let (url, server) = serve_once("429 Too Many Requests");

    let outcome = http_sender().send_message(&url, "hello", None, None);
    server.join().unwrap();

    assert_eq!(outcome, DeliveryOutcome::RateLimited);
}

#[test]
fn test_unreachable_webhook_fails_quietly() {
    // Bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{port}/api/webhooks/1/token");

    let outcome = http_sender().send_message(&url, "hello", None, None);
    assert!(matches!(outcome, DeliveryOutcome::Failed(_)));
}

#[test]
fn test_failure_log_has_cause_but_not_token() {
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{port}/api/webhooks/123/SECRET-TOKEN");
    let logs = LogCapture::default();

    let outcome = logs.capture(|| http_sender().send_message(&url, "hello", None, None));

    let DeliveryOutcome::Failed(message) = outcome else {
        panic!("expected a failed delivery, got {outcome:?}");
    };
    assert!(!message.contains("SECRET-TOKEN"));
    assert!(message.contains(&format!("http://127.0.0.1:{port}")));

    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    let line = &warnings[0];
    assert!(line.contains("Failed to send Discord webhook"));
    assert!(!line.contains("SECRET-TOKEN"));
    assert!(!line.contains("/api/webhooks"));
    assert!(line.to_ascii_lowercase().contains("refused"), "cause missing: {line}");
    assert!(line.contains("category=\"network\""));
}

#[test]
fn test_silent_server_reports_request_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let url = format!("{origin}/api/webhooks/123/SECRET-TOKEN");

    // Accept and hold the connection without ever answering
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(std::time::Duration::from_secs(12));
        drop(stream);
    });

    let outcome = http_sender().send_message(&url, "hello", None, None);
    server.join().unwrap();

    let DeliveryOutcome::Failed(message) = outcome else {
        panic!("expected a failed delivery, got {outcome:?}");
    };
    assert!(
        message.starts_with(&format!("Network timeout after 10 seconds to {origin}: ")),
        "unexpected message: {message}"
    );
    assert!(message.len() > format!("Network timeout after 10 seconds to {origin}: ").len());
    assert!(!message.contains("SECRET-TOKEN"));
}
