//! 7TV API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::dto::{EmoteResponse, StatusResponse};
use crate::domain::entities::EmoteManifest;
use crate::domain::errors::EmoteError;
use crate::domain::ports::EmoteSourcePort;

/// Default 7TV API host.
pub const SEVEN_TV_API_URL: &str = "https://7tv.io";

/// Default 7TV API version.
pub const SEVEN_TV_API_VERSION: &str = "v3";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("emote-porter/", env!("CARGO_PKG_VERSION"));

/// Status text 7TV uses to flag unknown emotes inside a 200 response.
const NOT_FOUND_MARKER: &str = "Not Found";

/// 7TV emote API client.
#[derive(Debug, Clone)]
pub struct SevenTvClient {
    client: Client,
    endpoint: String,
}

impl SevenTvClient {
    /// Creates client against the public 7TV API.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, EmoteError> {
        Self::with_base_url(SEVEN_TV_API_URL, SEVEN_TV_API_VERSION, DEFAULT_TIMEOUT)
    }

    /// Creates client with custom base URL, API version and timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        base_url: &str,
        version: &str,
        timeout: Duration,
    ) -> Result<Self, EmoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| EmoteError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), version),
        })
    }

    /// Returns the manifest URL of an emote.
    #[must_use]
    pub fn manifest_url(&self, emote_id: &str) -> String {
        format!("{}/emotes/{emote_id}", self.endpoint)
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "failed to connect to 7TV".to_string()
    } else if e.is_builder() {
        format!("invalid URL: {e}")
    } else {
        e.to_string()
    }
}

/// Timeouts are transport failures wherever they happen; anything else on a
/// file download is a download failure.
fn download_error(url: &str, e: &reqwest::Error) -> EmoteError {
    if e.is_timeout() {
        EmoteError::transport(format!("{url}: {}", describe(e)))
    } else {
        EmoteError::download_failed(url, describe(e))
    }
}

/// Interprets a manifest response.
///
/// A `status: "Not Found"` marker in a 200 body counts as a 404.
///
/// # Errors
/// Returns [`EmoteError::NotFound`] or [`EmoteError::ManifestMalformed`].
pub fn parse_manifest(
    emote_id: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<EmoteManifest, EmoteError> {
    if status == StatusCode::NOT_FOUND {
        return Err(EmoteError::not_found(emote_id));
    }

    if status != StatusCode::OK {
        return Err(EmoteError::malformed(emote_id, format!("HTTP {status}")));
    }

    if let Ok(marker) = serde_json::from_slice::<StatusResponse>(body)
        && marker.status.as_deref() == Some(NOT_FOUND_MARKER)
    {
        return Err(EmoteError::not_found(emote_id));
    }

    serde_json::from_slice::<EmoteResponse>(body)
        .map(EmoteManifest::from)
        .map_err(|e| EmoteError::malformed(emote_id, e.to_string()))
}

#[async_trait]
impl EmoteSourcePort for SevenTvClient {
    async fn fetch_manifest(&self, emote_id: &str) -> Result<EmoteManifest, EmoteError> {
        let url = self.manifest_url(emote_id);

        debug!(emote_id, url = %url, "Fetching emote manifest");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach 7TV API");
            EmoteError::transport(describe(&e))
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| EmoteError::transport(describe(&e)))?;

        let manifest = parse_manifest(emote_id, status, &body)?;

        debug!(
            emote_id,
            name = %manifest.name,
            animated = manifest.animated,
            variants = manifest.variants.len(),
            "Emote manifest fetched"
        );

        Ok(manifest)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, EmoteError> {
        debug!(url, "Downloading emote file");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(url, &e))?;

        if response.status() != StatusCode::OK {
            return Err(EmoteError::download_failed(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(url, &e))?;

        debug!(url, size = bytes.len(), "Emote file downloaded");

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const EMOTE_JSON: &str = r#"{
        "id": "60ae958e229664e8667aea38",
        "name": "peepoHey",
        "animated": true,
        "host": {
            "url": "//cdn.7tv.app/emote/60ae958e229664e8667aea38",
            "files": [
                { "name": "1x.gif", "width": 32, "height": 32, "size": 4210, "format": "GIF" },
                { "name": "4x.gif", "width": 128, "height": 128, "size": 40211, "format": "GIF" }
            ]
        }
    }"#;

    /// Serves one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        addr
    }

    fn client_for(addr: SocketAddr) -> SevenTvClient {
        SevenTvClient::with_base_url(&format!("http://{addr}"), "v3", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = SevenTvClient::new().unwrap();
        assert_eq!(client.manifest_url("abc"), "https://7tv.io/v3/emotes/abc");
    }

    #[test]
    fn test_parse_manifest() {
        let manifest =
            parse_manifest("60ae958e229664e8667aea38", StatusCode::OK, EMOTE_JSON.as_bytes())
                .unwrap();

        assert_eq!(manifest.name, "peepoHey");
        assert!(manifest.animated);
        assert_eq!(manifest.variants.len(), 2);
        assert_eq!(manifest.variants[1].size_bytes, 40211);
    }

    #[test]
    fn test_parse_not_found_marker() {
        let body = br#"{ "status_code": 404, "status": "Not Found", "error": "emote not found" }"#;
        let err = parse_manifest("x", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, EmoteError::NotFound { emote_id } if emote_id == "x"));
    }

    #[test]
    fn test_parse_http_404() {
        let err = parse_manifest("x", StatusCode::NOT_FOUND, b"").unwrap_err();
        assert!(matches!(err, EmoteError::NotFound { .. }));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_manifest("x", StatusCode::OK, br#"{ "id": "x" }"#).unwrap_err();
        assert!(matches!(err, EmoteError::ManifestMalformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_manifest_over_http() {
        let addr = serve_once("200 OK", EMOTE_JSON.as_bytes()).await;

        let manifest = client_for(addr)
            .fetch_manifest("60ae958e229664e8667aea38")
            .await
            .unwrap();

        assert_eq!(manifest.id, "60ae958e229664e8667aea38");
    }

    #[tokio::test]
    async fn test_fetch_manifest_404() {
        let addr = serve_once("404 Not Found", b"").await;

        let err = client_for(addr).fetch_manifest("missing").await.unwrap_err();

        assert!(matches!(err, EmoteError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_bytes_non_200_fails() {
        let addr = serve_once("500 Internal Server Error", b"oops").await;

        let err = client_for(addr)
            .fetch_bytes(&format!("http://{addr}/emote/x/4x.gif"))
            .await
            .unwrap_err();

        assert!(matches!(err, EmoteError::DownloadFailed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let addr = serve_once("200 OK", b"GIF89a").await;

        let bytes = client_for(addr)
            .fetch_bytes(&format!("http://{addr}/emote/x/1x.gif"))
            .await
            .unwrap();

        assert_eq!(&bytes[..], b"GIF89a");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr).fetch_manifest("x").await.unwrap_err();

        assert!(err.is_network_error());
    }

    #[tokio::test]
    async fn test_download_timeout_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client =
            SevenTvClient::with_base_url(&format!("http://{addr}"), "v3", Duration::from_millis(200))
                .unwrap();
        let err = client
            .fetch_bytes(&format!("http://{addr}/emote/x/1x.gif"))
            .await
            .unwrap_err();

        assert!(matches!(err, EmoteError::Transport { .. }));
    }
}
