use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::materializer::{MaterializationError, TrackMaterializer};
use super::messages;
use super::notifier::Notifier;
use super::player::PlaybackSession;
use super::queue_manager::QueueManager;
use super::resolver::{ResolutionFailure, ResolverGateway};
use super::session_registry::SessionRegistry;
use super::voice::{VoiceError, VoiceTransport};
use super::worker_pool::WorkerPool;
use crate::commands::music::audio_sources::{MediaResolver, ResolutionError, Track};
use crate::config::BotConfig;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Materialization(#[from] MaterializationError),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Outcome of queueing a `play` query
#[derive(Debug, Default)]
pub struct EnqueueReport {
    pub added: usize,
    pub failures: Vec<ResolutionFailure>,
}

/// Owns the per-guild music state and implements every music command.
///
/// Command handlers call into this type and only format its results.
pub struct MusicManager {
    queues: QueueManager,
    sessions: SessionRegistry,
    gateway: ResolverGateway,
    materializer: TrackMaterializer,
    transport: Arc<dyn VoiceTransport>,
    // Serializes session start/teardown and `leave` per guild
    guild_locks: DashMap<GuildId, Arc<Mutex<()>>>,
    poll_interval: Duration,
}

impl MusicManager {
    pub fn new(
        resolver: Arc<dyn MediaResolver>,
        transport: Arc<dyn VoiceTransport>,
        resolver_workers: usize,
        poll_interval: Duration,
    ) -> Self {
        let gateway = ResolverGateway::new(resolver, WorkerPool::new(resolver_workers));
        Self {
            queues: QueueManager::new(),
            sessions: SessionRegistry::new(),
            materializer: TrackMaterializer::new(gateway.clone()),
            gateway,
            transport,
            guild_locks: DashMap::new(),
            poll_interval,
        }
    }

    pub fn from_config(
        config: &BotConfig,
        resolver: Arc<dyn MediaResolver>,
        transport: Arc<dyn VoiceTransport>,
    ) -> Self {
        Self::new(
            resolver,
            transport,
            config.resolver_workers,
            config.poll_interval,
        )
    }

    pub fn queues(&self) -> &QueueManager {
        &self.queues
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn materializer(&self) -> &TrackMaterializer {
        &self.materializer
    }

    pub fn transport(&self) -> &Arc<dyn VoiceTransport> {
        &self.transport
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn guild_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        Arc::clone(self.guild_locks.entry(guild_id).or_default().value())
    }

    /// Join (or move to) the given voice channel
    pub async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        self.transport.connect(guild_id, channel_id).await?;
        Ok(())
    }

    /// Resolve `query` and append every successfully resolved track to the guild's queue,
    /// in listing order. Each failed item is reported through `notifier` and counted; a query
    /// that cannot be listed at all counts as one failed item.
    pub async fn enqueue_query(
        &self,
        guild_id: GuildId,
        query: &str,
        notifier: &dyn Notifier,
    ) -> EnqueueReport {
        let results = match self.gateway.resolve_collection(query).await {
            Ok(results) => results,
            Err(error) => vec![Err(ResolutionFailure {
                title: query.to_string(),
                error,
            })],
        };

        let mut report = EnqueueReport::default();
        for result in results {
            match result {
                Ok(track) => {
                    self.queues.enqueue(guild_id, track);
                    report.added += 1;
                }
                Err(failure) => {
                    notifier
                        .notify(&messages::could_not_process(&failure.title, &failure.error))
                        .await;
                    report.failures.push(failure);
                }
            }
        }

        info!(
            "Queued {} track(s) for guild {} ({} failed)",
            report.added,
            guild_id,
            report.failures.len()
        );
        report
    }

    /// Start a playback session for the guild if it has queued tracks and none is running.
    ///
    /// Connects to `channel_id` first when the guild has no live voice connection.
    /// Returns whether a new session was started.
    pub async fn ensure_session(
        self: &Arc<Self>,
        guild_id: GuildId,
        channel_id: Option<ChannelId>,
        notifier: Arc<dyn Notifier>,
    ) -> MusicResult<bool> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        if self.queues.is_empty(guild_id) {
            debug!("Nothing queued for guild {}, no session needed", guild_id);
            return Ok(false);
        }
        if self.sessions.is_running(guild_id) {
            return Ok(false);
        }

        if !self.transport.is_connected(guild_id).await {
            let connected = match channel_id {
                Some(channel_id) => self
                    .transport
                    .connect(guild_id, channel_id)
                    .await
                    .map_err(MusicError::from),
                None => Err(MusicError::NotConnected),
            };

            // Nothing would ever play the queued tracks
            if let Err(e) = connected {
                warn!("Dropping queue for guild {}: {}", guild_id, e);
                self.queues.remove(guild_id);
                return Err(e);
            }
        }

        let manager = Arc::clone(self);
        Ok(self.sessions.start_if_absent(guild_id, move |ticket| {
            PlaybackSession::new(manager, ticket, notifier).run()
        }))
    }

    /// Stop the current track so the session moves on. Returns `false` if nothing was playing.
    pub async fn skip(&self, guild_id: GuildId) -> MusicResult<bool> {
        if !self.is_active(guild_id).await {
            return Ok(false);
        }

        self.transport.stop(guild_id).await?;
        self.sessions.request_skip(guild_id);
        Ok(true)
    }

    pub async fn pause(&self, guild_id: GuildId) -> MusicResult<bool> {
        if !self.transport.is_playing(guild_id).await {
            return Ok(false);
        }
        self.transport.pause(guild_id).await?;
        Ok(true)
    }

    pub async fn resume(&self, guild_id: GuildId) -> MusicResult<bool> {
        if !self.transport.is_paused(guild_id).await {
            return Ok(false);
        }
        self.transport.resume(guild_id).await?;
        Ok(true)
    }

    /// Clear the queue and stop the current track; the session then drains and disconnects.
    /// Returns `false` if the bot is not in a voice channel.
    pub async fn stop(&self, guild_id: GuildId) -> MusicResult<bool> {
        if !self.transport.is_connected(guild_id).await {
            return Ok(false);
        }

        self.queues.clear(guild_id);
        self.transport.stop(guild_id).await?;
        self.sessions.request_stop(guild_id);
        Ok(true)
    }

    /// Tear down the guild's session and queue and disconnect, whatever state they are in.
    /// Returns `false` if the bot was not in a voice channel.
    pub async fn leave(&self, guild_id: GuildId) -> MusicResult<bool> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        self.sessions.abort(guild_id);
        self.queues.remove(guild_id);

        if !self.transport.is_connected(guild_id).await {
            return Ok(false);
        }

        match self.transport.disconnect(guild_id).await {
            Ok(()) => Ok(true),
            Err(VoiceError::NotConnected) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The track the guild's session is currently playing (not paused)
    pub async fn now_playing(&self, guild_id: GuildId) -> Option<Track> {
        if !self.transport.is_playing(guild_id).await {
            return None;
        }
        self.sessions.now_playing(guild_id).await
    }

    pub fn queue_snapshot(&self, guild_id: GuildId) -> Vec<Track> {
        self.queues.peek_all(guild_id)
    }

    async fn is_active(&self, guild_id: GuildId) -> bool {
        self.transport.is_playing(guild_id).await || self.transport.is_paused(guild_id).await
    }
}
