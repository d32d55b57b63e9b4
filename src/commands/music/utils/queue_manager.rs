use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::commands::music::audio_sources::Track;

/// Pending tracks for every guild.
///
/// Each guild's queue is a FIFO. All mutations for one guild go through the map's
/// per-shard lock, so concurrent producers for the same guild never lose or duplicate
/// entries while different guilds do not contend on a global lock.
#[derive(Debug, Default)]
pub struct QueueManager {
    queues: DashMap<GuildId, VecDeque<Track>>,
}

impl QueueManager {
    /// Create a new queue manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track to the tail of a guild's queue, creating the queue if needed.
    /// Returns the new queue length.
    pub fn enqueue(&self, guild_id: GuildId, track: Track) -> usize {
        let mut queue = self.queues.entry(guild_id).or_default();
        debug!("Queueing '{}' for guild {}", track.title, guild_id);
        queue.push_back(track);
        queue.len()
    }

    /// Take the next track from the head of a guild's queue
    pub fn pop_front(&self, guild_id: GuildId) -> Option<Track> {
        self.queues.get_mut(&guild_id)?.pop_front()
    }

    /// Snapshot of a guild's pending tracks, in play order
    pub fn peek_all(&self, guild_id: GuildId) -> Vec<Track> {
        self.queues
            .get(&guild_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Empty a guild's queue but keep it in existence
    pub fn clear(&self, guild_id: GuildId) {
        if let Some(mut queue) = self.queues.get_mut(&guild_id) {
            info!("Clearing {} queued tracks for guild {}", queue.len(), guild_id);
            queue.clear();
        }
    }

    pub fn exists(&self, guild_id: GuildId) -> bool {
        self.queues.contains_key(&guild_id)
    }

    pub fn len(&self, guild_id: GuildId) -> usize {
        self.queues.get(&guild_id).map_or(0, |queue| queue.len())
    }

    pub fn is_empty(&self, guild_id: GuildId) -> bool {
        self.len(guild_id) == 0
    }

    /// Delete a guild's queue, whatever it holds
    pub fn remove(&self, guild_id: GuildId) -> Option<Vec<Track>> {
        self.queues
            .remove(&guild_id)
            .map(|(_, queue)| queue.into_iter().collect())
    }

    /// Delete a guild's queue only if it is still empty, atomically with respect to
    /// concurrent enqueues. Returns `true` when no queue remains for the guild.
    pub fn remove_if_empty(&self, guild_id: GuildId) -> bool {
        self.queues.remove_if(&guild_id, |_, queue| queue.is_empty());
        !self.queues.contains_key(&guild_id)
    }
}
