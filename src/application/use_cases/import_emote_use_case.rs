//! Emote import pipeline: fetch, select, download, transcode.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{ImportEmoteRequest, ImportEmoteResponse};
use crate::domain::entities::{EmoteFormat, EncodedEmote};
use crate::domain::errors::EmoteError;
use crate::domain::ports::{EmoteSourcePort, EmoteTranscoderPort};
use crate::domain::services::{extract_emote_id, select_variant, to_emoji_name, truncate_name};

/// Turns a remote emote into bytes that fit the emoji size budget.
#[derive(Clone)]
pub struct ImportEmoteUseCase {
    source: Arc<dyn EmoteSourcePort>,
    transcoder: Arc<dyn EmoteTranscoderPort>,
}

impl ImportEmoteUseCase {
    /// Creates new import use case.
    #[must_use]
    pub const fn new(
        source: Arc<dyn EmoteSourcePort>,
        transcoder: Arc<dyn EmoteTranscoderPort>,
    ) -> Self {
        Self { source, transcoder }
    }

    /// Imports an emote by URL or id and picks the emoji name to upload it under.
    ///
    /// # Errors
    /// Returns error if any pipeline step fails.
    pub async fn execute(
        &self,
        request: ImportEmoteRequest,
    ) -> Result<ImportEmoteResponse, EmoteError> {
        let emote_id = extract_emote_id(&request.emote);
        let emote = self.import_emote(emote_id, request.square_fit).await?;

        let (emoji_name, uses_custom_name) = match request.custom_name.as_deref() {
            Some(custom) if !custom.trim().is_empty() => (to_emoji_name(custom), true),
            _ => (to_emoji_name(&emote.name), false),
        };

        Ok(ImportEmoteResponse {
            emote,
            emoji_name,
            uses_custom_name,
        })
    }

    /// Runs the pipeline for one emote id.
    ///
    /// Network calls are made at most once each; the only retries are the
    /// transcoder's frame-skip attempts.
    ///
    /// # Errors
    /// Returns [`EmoteError::NotFound`] or [`EmoteError::ManifestMalformed`] for
    /// a missing or unreadable manifest, [`EmoteError::NoFittingVariant`] when no
    /// declared variant fits, [`EmoteError::DownloadFailed`] when the variant
    /// cannot be fetched, and transcoder errors unchanged.
    pub async fn import_emote(
        &self,
        emote_id: &str,
        square_fit: bool,
    ) -> Result<EncodedEmote, EmoteError> {
        let size_limit = self.transcoder.size_limit();

        debug!(emote_id, square_fit, budget = size_limit, "Importing emote");

        let manifest = self.source.fetch_manifest(emote_id).await.map_err(|e| {
            warn!(emote_id, error = %e, "Failed to fetch emote manifest");
            e
        })?;

        let fitting = select_variant(&manifest, manifest.animated, size_limit)?;

        let bytes = self.source.fetch_bytes(&fitting.download_url).await?;

        let transcoder = self.transcoder.clone();
        let transcoded =
            tokio::task::spawn_blocking(move || transcoder.transcode(&bytes, square_fit))
                .await
                .map_err(|e| EmoteError::encode(format!("transcode task failed: {e}")))??;

        info!(
            emote_id,
            name = %manifest.name,
            file = %fitting.variant.file_name,
            animated = transcoded.animated,
            stride = transcoded.stride,
            size = transcoded.bytes.len(),
            "Emote ready"
        );

        Ok(EncodedEmote {
            source_id: manifest.id,
            name: truncate_name(&manifest.name),
            format: EmoteFormat::for_animated(transcoded.animated),
            animated: transcoded.animated,
            width: transcoded.width,
            height: transcoded.height,
            source_url: fitting.download_url,
            bytes: transcoded.bytes,
        })
    }
}
