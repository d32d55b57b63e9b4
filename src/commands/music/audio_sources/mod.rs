//! This module defines the seam between the bot and the external media-info resolver.
//! It includes the `yt-dlp` implementation and the `Track`/`MediaInfo` types produced
//! from resolver output.

/// Submodule defining `Track` and the raw `MediaInfo` returned by the resolver.
pub(crate) mod track_metadata;
/// Submodule implementing `MediaResolver` on top of the `yt-dlp` executable.
pub(crate) mod ytdlp;

pub use track_metadata::{MediaInfo, Track};
pub use ytdlp::YtDlpResolver;

use thiserror::Error;

/// Errors produced while turning a URL or search term into track metadata.
///
/// Every variant is recoverable: callers skip the item and report it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("{0}")]
    Unavailable(String),

    #[error("Could not retrieve data from URL (may be age-restricted or unavailable).")]
    NoData,

    #[error("Failed to run media resolver: {0}")]
    Process(String),

    #[error("Failed to parse resolver output: {0}")]
    Parse(String),

    #[error("Resolver worker failed: {0}")]
    Worker(String),
}

/// How much work the resolver should do for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// List playlist entries without resolving each of them (cheap, not playable).
    pub flat: bool,
    /// Treat the query as a single item even when it points into a playlist.
    pub single: bool,
}

impl ExtractOptions {
    /// Options for the first, cheap pass over a query that may be a playlist.
    pub const LISTING: Self = Self {
        flat: true,
        single: false,
    };

    /// Options for a full resolution of one item, yielding a direct stream URL.
    pub const SINGLE: Self = Self {
        flat: false,
        single: true,
    };
}

/// Blocking interface to an external media-info extractor.
///
/// Implementations may perform network and process I/O; callers must run them on the
/// resolver worker pool, never directly on the async runtime.
#[cfg_attr(test, mockall::automock)]
pub trait MediaResolver: Send + Sync {
    fn extract(&self, query: &str, options: ExtractOptions) -> Result<MediaInfo, ResolutionError>;
}
