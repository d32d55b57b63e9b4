use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::worker_pool::WorkerPool;
use crate::commands::music::audio_sources::{
    ExtractOptions, MediaInfo, MediaResolver, ResolutionError, Track,
};

/// A listing entry that could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionFailure {
    /// Best known title for the failed item, used in user-facing reports
    pub title: String,
    pub error: ResolutionError,
}

/// Resolves queries into tracks on the resolver worker pool
#[derive(Clone)]
pub struct ResolverGateway {
    resolver: Arc<dyn MediaResolver>,
    pool: WorkerPool,
}

impl ResolverGateway {
    pub fn new(resolver: Arc<dyn MediaResolver>, pool: WorkerPool) -> Self {
        Self { resolver, pool }
    }

    /// Run one blocking extraction off the async runtime.
    pub async fn extract(
        &self,
        query: &str,
        options: ExtractOptions,
    ) -> Result<MediaInfo, ResolutionError> {
        let resolver = Arc::clone(&self.resolver);
        let query = query.to_string();

        self.pool
            .run(move || resolver.extract(&query, options))
            .await
            .map_err(|e| ResolutionError::Worker(e.to_string()))?
    }

    /// Fully resolve a single item. Listings collapse to their first entry.
    pub async fn resolve_single(&self, query: &str) -> Result<Track, ResolutionError> {
        let info = self
            .extract(query, ExtractOptions::SINGLE)
            .await?
            .into_first_entry()?;

        Ok(Track::from_resolved(&info, query))
    }

    /// Resolve a query that may name a playlist.
    ///
    /// The query is first listed cheaply; each listed entry is then resolved on its own,
    /// concurrently. Results keep the listing order and one bad entry never affects the others.
    /// A query that is not a listing yields exactly one result.
    pub async fn resolve_collection(
        &self,
        query: &str,
    ) -> Result<Vec<Result<Track, ResolutionFailure>>, ResolutionError> {
        let listing = self.extract(query, ExtractOptions::LISTING).await?;

        if !listing.is_listing() {
            debug!("'{}' is not a listing, resolving as a single item", query);
            let result = self.resolve_single(query).await.map_err(|error| ResolutionFailure {
                title: listing.title.clone().unwrap_or_else(|| query.to_string()),
                error,
            });
            return Ok(vec![result]);
        }

        let entries: Vec<Track> = listing
            .entries
            .unwrap_or_default()
            .iter()
            .flatten()
            .filter_map(Track::from_listing_entry)
            .collect();

        info!(
            "Resolving {} listed entries for '{}' on {} workers",
            entries.len(),
            query,
            self.pool.size()
        );

        let results = join_all(entries.into_iter().map(|entry| async move {
            self.resolve_single(&entry.source_locator)
                .await
                .map(|mut track| {
                    if track.duration.is_none() {
                        track.duration = entry.duration;
                    }
                    track
                })
                .map_err(|error| {
                    warn!("Could not resolve listed entry '{}': {}", entry.title, error);
                    ResolutionFailure {
                        title: entry.title.clone(),
                        error,
                    }
                })
        }))
        .await;

        Ok(results)
    }
}
