//! Defines `Track`, the unit stored in a guild queue, and `MediaInfo`, the subset of
//! resolver JSON the bot cares about.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::ResolutionError;

const UNKNOWN_TITLE: &str = "Unknown Title";

/// Raw metadata as produced by the resolver (`yt-dlp -J`).
///
/// Listing extraction fills `entries`; single-item extraction fills `url` with a direct
/// stream URL.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MediaInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub duration: Option<f64>,
    pub entries: Option<Vec<Option<MediaInfo>>>,
}

impl MediaInfo {
    /// Parse resolver JSON. A literal `null` means the resolver found nothing usable.
    pub fn from_json(raw: &str) -> Result<Self, ResolutionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(ResolutionError::NoData);
        }

        serde_json::from_str(trimmed).map_err(|e| ResolutionError::Parse(e.to_string()))
    }

    /// True when the query resolved to a non-empty list of entries (playlist, search results).
    pub fn is_listing(&self) -> bool {
        self.entries.as_ref().is_some_and(|entries| !entries.is_empty())
    }

    /// Collapse a listing to its first entry; non-listings are returned as-is.
    pub fn into_first_entry(self) -> Result<MediaInfo, ResolutionError> {
        match self.entries {
            Some(entries) => entries
                .into_iter()
                .next()
                .flatten()
                .ok_or(ResolutionError::NoData),
            None => Ok(self),
        }
    }

    pub fn title_or_default(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    /// Where this item can be looked up again later.
    ///
    /// Flat entries usually carry only an id and a (sometimes relative) url, so fall back to
    /// a YouTube watch URL built from the id.
    pub fn locator(&self) -> Option<String> {
        if let Some(page) = &self.webpage_url {
            return Some(page.clone());
        }

        if let Some(url) = self.url.as_deref().filter(|u| is_absolute_url(u)) {
            return Some(url.to_string());
        }

        self.id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
    }
}

fn is_absolute_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// A queued track.
///
/// `resolved` flips to `true` once the track has been fully resolved to a playable
/// stream; tracks from a flat listing start out unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    /// URL, platform id or search term that the resolver understands.
    pub source_locator: String,
    pub resolved: bool,
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(title: impl Into<String>, source_locator: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_locator: source_locator.into(),
            resolved: false,
            duration: None,
        }
    }

    /// Build an unresolved track from a flat listing entry.
    /// Entries without any locator are dropped.
    pub fn from_listing_entry(entry: &MediaInfo) -> Option<Self> {
        let locator = entry.locator()?;
        Some(Self {
            duration: entry.duration(),
            ..Self::new(entry.title_or_default(), locator)
        })
    }

    /// Build a resolved track from a full extraction of `query`.
    pub fn from_resolved(info: &MediaInfo, query: &str) -> Self {
        Self {
            title: info.title_or_default(),
            source_locator: info.locator().unwrap_or_else(|| query.to_string()),
            resolved: true,
            duration: info.duration(),
        }
    }
}
