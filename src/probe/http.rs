// ABOUTME: HTTP state probe against the competition API of each host.
// ABOUTME: One bounded GET per host, parsing the `state` field of a JSON body.

use super::StateProbe;
use crate::config::Settings;
use crate::types::{Host, RevisionId};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;

#[derive(Debug, Error)]
enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(String),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("malformed state response: {0}")]
    Body(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    state: RevisionId,
}

/// Queries `http://<host>:<port>/<path>` for the host's applied revision.
#[derive(Debug, Clone)]
pub struct HttpStateProbe {
    port: u16,
    path: String,
    timeout: Duration,
}

impl HttpStateProbe {
    pub fn new(port: u16, path: impl Into<String>, timeout: Duration) -> Self {
        let path = path.into();
        Self {
            port,
            path: format!("/{}", path.trim_start_matches('/')),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.http_port,
            settings.state_path.as_str(),
            settings.probe_timeout,
        )
    }

    fn authority(&self, host: &Host) -> String {
        if self.port == 80 {
            host.to_string()
        } else {
            format!("{}:{}", host, self.port)
        }
    }

    async fn fetch_state(&self, host: &Host) -> Result<RevisionId, ProbeError> {
        let stream = TcpStream::connect((host.as_str(), self.port))
            .await
            .map_err(ProbeError::Connect)?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("state probe connection error: {}", e);
            }
        });

        let req = hyper::Request::builder()
            .method("GET")
            .uri(self.path.as_str())
            .header(hyper::header::HOST, self.authority(host))
            .header(hyper::header::ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        let resp = sender.send_request(req).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }

        let body = resp.into_body().collect().await?.to_bytes();
        let response: StateResponse = serde_json::from_slice(&body)?;
        Ok(response.state)
    }
}

#[async_trait]
impl StateProbe for HttpStateProbe {
    async fn probe(&self, host: &Host) -> Option<RevisionId> {
        let result = match tokio::time::timeout(self.timeout, self.fetch_state(host)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };

        match result {
            Ok(revision) => {
                tracing::debug!("{} reports state {}", host, revision);
                Some(revision)
            }
            Err(e) => {
                tracing::warn!("Failed to get state from {}: {}", host, e);
                None
            }
        }
    }
}
