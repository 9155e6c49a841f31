//! Remote snapshot client
//!
//! Snapshots live in a network store addressed by opaque key:
//! `GET <base_url><key>` returns the diagram JSON. Defines the fetcher
//! trait and two implementations:
//! - `HttpSnapshotFetcher`: talks to the store over HTTP (production)
//! - `StaticSnapshotFetcher`: serves preconfigured snapshots (testing)
//!
//! `RemoteSnapshotClient` wraps a fetcher and never fails: any error
//! becomes a notice plus "no diagram".

use crate::diagram::SerializedDiagram;
use crate::fragment::FragmentReference;
use crate::notify::{LogNotifier, Notice, Notifier};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Default remote snapshot store
pub const DEFAULT_BASE_URL: &str = "https://diagramstore.aksw.org/";

/// Errors from snapshot fetches
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("snapshot store answered {0}")]
    Status(u16),
    #[error("snapshot is not a diagram: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot not found: {0}")]
    NotFound(String),
}

/// Fetches a serialized diagram by key.
///
/// Abstracts over transport so the loader doesn't depend on how the
/// snapshot store is reached.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<SerializedDiagram, RemoteError>;
}

/// HTTP fetcher against a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpSnapshotFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("trellis/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The key is appended to the base URL as-is.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self, key: &str) -> Result<SerializedDiagram, RemoteError> {
        let url = self.url_for(key);
        debug!(%url, "fetching remote snapshot");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(SerializedDiagram::from_json_str(&body)?)
    }
}

/// Serves snapshots from a map and counts fetches (testing).
#[derive(Debug, Default)]
pub struct StaticSnapshotFetcher {
    snapshots: HashMap<String, SerializedDiagram>,
    fetches: AtomicUsize,
}

impl StaticSnapshotFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, key: impl Into<String>, diagram: SerializedDiagram) -> Self {
        self.snapshots.insert(key.into(), diagram);
        self
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotFetcher for StaticSnapshotFetcher {
    async fn fetch(&self, key: &str) -> Result<SerializedDiagram, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .get(key)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(key.to_string()))
    }
}

/// Loads snapshots from the remote store, normalizing failures to `None`
#[derive(Clone)]
pub struct RemoteSnapshotClient {
    fetcher: Arc<dyn SnapshotFetcher>,
    notifier: Arc<dyn Notifier>,
}

impl RemoteSnapshotClient {
    pub fn new(fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        Self {
            fetcher,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Client against `base_url` over HTTP.
    pub fn http(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Ok(Self::new(Arc::new(HttpSnapshotFetcher::new(base_url)?)))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fetch the snapshot stored under `key`.
    ///
    /// Any failure is reported as a notice carrying a truncated key and
    /// yields `None`.
    pub async fn load(&self, key: &str) -> Option<SerializedDiagram> {
        match self.fetcher.fetch(key).await {
            Ok(diagram) => {
                info!(key, "loaded remote snapshot");
                Some(diagram)
            }
            Err(e) => {
                debug!(key, error = %e, "remote snapshot unavailable");
                self.notifier.notify(Notice::cloud_not_found(key));
                None
            }
        }
    }

    /// Load whatever a fragment's cloud key names. Other references resolve
    /// to `None` without a network call.
    pub async fn load_fragment(&self, reference: &FragmentReference) -> Option<SerializedDiagram> {
        match reference.cloud_key() {
            Some(key) => self.load(key).await,
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sample_diagram() -> SerializedDiagram {
        SerializedDiagram::new(json!({ "elements": [], "links": [] }), Vec::new())
    }

    /// Serve one canned HTTP response on a local port; returns the base URL
    /// and a handle yielding the request line that was received.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (format!("http://{}/", addr), handle)
    }

    /// Loopback fetcher that ignores any proxy settings in the environment
    fn local_fetcher(base: String) -> HttpSnapshotFetcher {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSnapshotFetcher::with_client(client, base)
    }

    #[tokio::test]
    async fn http_fetch_appends_key_to_base_url() {
        let body = sample_diagram().to_json_string().unwrap();
        let (base, server) = serve_once("200 OK", body).await;

        let fetcher = local_fetcher(base);
        let diagram = fetcher.fetch("abc123").await.unwrap();

        assert_eq!(diagram, sample_diagram());
        assert_eq!(server.await.unwrap(), "GET /abc123 HTTP/1.1");
    }

    #[tokio::test]
    async fn http_non_success_is_an_error() {
        let (base, _server) = serve_once("404 Not Found", "{}".to_string()).await;

        let fetcher = local_fetcher(base);
        let err = fetcher.fetch("abc").await.unwrap_err();
        assert!(matches!(err, RemoteError::Status(404)));
    }

    #[tokio::test]
    async fn http_legacy_body_is_wrapped() {
        let (base, _server) = serve_once("200 OK", r#"{"cells": []}"#.to_string()).await;

        let client = RemoteSnapshotClient::new(Arc::new(local_fetcher(base)));
        let diagram = client.load("legacy").await.unwrap();
        assert!(diagram.link_type_options.is_empty());
        assert_eq!(diagram.layout_data, json!({ "cells": [] }));
    }

    #[tokio::test]
    async fn http_garbage_body_is_none_with_notice() {
        let (base, _server) = serve_once("200 OK", "<html>".to_string()).await;
        let notifier = Arc::new(RecordingNotifier::new());

        let client = RemoteSnapshotClient::new(Arc::new(local_fetcher(base)))
            .with_notifier(notifier.clone());
        assert!(client.load("0123456789").await.is_none());
        assert_eq!(notifier.notices(), vec![Notice::cloud_not_found("0123456789")]);
    }

    #[test]
    fn url_for_appends_key() {
        let fetcher = HttpSnapshotFetcher::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(fetcher.url_for("abc"), "https://diagramstore.aksw.org/abc");
    }

    #[tokio::test]
    async fn missing_snapshot_notifies_with_truncated_key() {
        let notifier = Arc::new(RecordingNotifier::new());
        let client = RemoteSnapshotClient::new(Arc::new(StaticSnapshotFetcher::new()))
            .with_notifier(notifier.clone());

        assert!(client.load("abcdefghijkl").await.is_none());
        assert_eq!(
            notifier.notices(),
            vec![Notice::CloudNotFound {
                key_preview: "abcdefgh…".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn fragment_gate_skips_network_for_other_references() {
        let fetcher = Arc::new(StaticSnapshotFetcher::new().with_snapshot("k", sample_diagram()));
        let client = RemoteSnapshotClient::new(fetcher.clone());

        assert!(client.load_fragment(&FragmentReference::parse("#k")).await.is_none());
        assert!(client.load_fragment(&FragmentReference::parse("#r=ex:a")).await.is_none());
        assert_eq!(fetcher.fetch_count(), 0);

        assert!(client.load_fragment(&FragmentReference::parse("#!k")).await.is_some());
        assert_eq!(fetcher.fetch_count(), 1);
    }
}
