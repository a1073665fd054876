use serde::Deserialize;

use crate::domain::entities::{EmoteManifest, EmoteVariant};

/// 7TV emote response structure.
#[derive(Debug, Deserialize)]
pub struct EmoteResponse {
    /// Emote id.
    pub id: String,
    /// Emote name.
    pub name: String,
    /// Whether the emote is animated.
    #[serde(default)]
    pub animated: bool,
    /// Where the emote files are hosted.
    pub host: HostResponse,
}

/// 7TV image host structure.
#[derive(Debug, Deserialize)]
pub struct HostResponse {
    /// Protocol-relative base URL of the files.
    pub url: String,
    /// Available files.
    #[serde(default)]
    pub files: Vec<FileResponse>,
}

/// 7TV hosted file structure.
#[derive(Debug, Deserialize)]
pub struct FileResponse {
    /// File name, e.g. `2x.webp`.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Size in bytes.
    pub size: u64,
}

/// Status marker 7TV sometimes returns with HTTP 200.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    /// Status text, e.g. `Not Found`.
    #[serde(default)]
    pub status: Option<String>,
}

impl From<EmoteResponse> for EmoteManifest {
    fn from(response: EmoteResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
            animated: response.animated,
            host_url: response.host.url,
            variants: response
                .host
                .files
                .into_iter()
                .map(|f| EmoteVariant::new(f.name, f.width, f.height, f.size))
                .collect(),
        }
    }
}
