use thiserror::Error;
use tracing::{debug, info};

use super::resolver::ResolverGateway;
use crate::commands::music::audio_sources::{ExtractOptions, ResolutionError, Track};

/// A track that is ready to hand to the voice transport
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableSource {
    pub title: String,
    /// Direct media URL the transport can stream from
    pub stream_url: String,
    pub page_url: Option<String>,
}

/// Failures turning a queued track into a playable stream. The session skips the track.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterializationError {
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    #[error("no playable stream was found")]
    NoStream,
}

/// Re-resolves queued tracks right before they play.
///
/// Queue-time metadata may come from a flat listing and stream URLs expire, so every
/// track is resolved again in full on the resolver worker pool.
#[derive(Clone)]
pub struct TrackMaterializer {
    gateway: ResolverGateway,
}

impl TrackMaterializer {
    pub fn new(gateway: ResolverGateway) -> Self {
        Self { gateway }
    }

    /// Resolve `track` to a direct stream, marking it resolved on success
    pub async fn materialize(
        &self,
        track: &mut Track,
    ) -> Result<PlayableSource, MaterializationError> {
        info!("Materializing '{}' from {}", track.title, track.source_locator);

        let info = self
            .gateway
            .extract(&track.source_locator, ExtractOptions::SINGLE)
            .await?
            .into_first_entry()?;

        let stream_url = info.url.clone().ok_or(MaterializationError::NoStream)?;
        debug!("Stream for '{}' resolved", track.title);

        track.resolved = true;
        Ok(PlayableSource {
            title: info.title.clone().unwrap_or_else(|| track.title.clone()),
            stream_url,
            page_url: info.webpage_url.clone(),
        })
    }
}
