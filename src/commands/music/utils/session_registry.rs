use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serenity::model::id::GuildId;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::futures::Notified;
use tokio::sync::{Notify, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::commands::music::audio_sources::Track;

/// Lifecycle of a guild's playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Between tracks: about to pop or materialize the next one
    Idle,
    /// A track was handed to the voice connection (includes paused)
    Playing,
    /// Queue ran dry (or the loop failed); disconnecting and cleaning up
    Draining,
    Terminated,
}

/// State a running session shares with command handlers
#[derive(Debug)]
pub struct SessionControl {
    skip: Notify,
    // Bumped by every `stop`; a track popped under an older epoch must not start
    stop_epoch: AtomicU64,
    now_playing: RwLock<Option<Track>>,
    state: watch::Sender<SessionState>,
}

impl Default for SessionControl {
    fn default() -> Self {
        Self {
            skip: Notify::new(),
            stop_epoch: AtomicU64::new(0),
            now_playing: RwLock::new(None),
            state: watch::Sender::new(SessionState::Idle),
        }
    }
}

impl SessionControl {
    /// Wake the session if it is waiting on the current track
    pub fn request_skip(&self) {
        self.skip.notify_waiters();
    }

    /// Cancel whatever track the session is about to play or is playing, then wake it
    pub fn request_stop(&self) {
        self.stop_epoch.fetch_add(1, Ordering::SeqCst);
        self.skip.notify_waiters();
    }

    pub fn stop_epoch(&self) -> u64 {
        self.stop_epoch.load(Ordering::SeqCst)
    }

    /// Completes on the next `request_skip`. Enable it before checking playback state so a
    /// skip issued in between is not lost.
    pub fn skip_requested(&self) -> Notified<'_> {
        self.skip.notified()
    }

    pub async fn now_playing(&self) -> Option<Track> {
        self.now_playing.read().await.clone()
    }

    pub async fn set_now_playing(&self, track: Option<Track>) {
        *self.now_playing.write().await = track;
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

/// Identity handed to a newly started session so it can deregister itself
#[derive(Debug, Clone)]
pub struct SessionTicket {
    pub guild_id: GuildId,
    pub id: u64,
    pub control: Arc<SessionControl>,
}

struct SessionEntry {
    id: u64,
    task: JoinHandle<()>,
    control: Arc<SessionControl>,
}

/// At most one running playback session per guild
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<GuildId, SessionEntry>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the session built by `factory` unless one is already running for the guild.
    ///
    /// The check and the registration happen under the guild's map entry, so concurrent
    /// callers for the same guild start exactly one session. Returns whether a session
    /// was started.
    pub fn start_if_absent<F, Fut>(&self, guild_id: GuildId, factory: F) -> bool
    where
        F: FnOnce(SessionTicket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match self.sessions.entry(guild_id) {
            Entry::Occupied(existing) if !existing.get().task.is_finished() => {
                debug!(
                    "Session {} already running for guild {}",
                    existing.get().id,
                    guild_id
                );
                false
            }
            entry => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let control = Arc::new(SessionControl::default());
                let ticket = SessionTicket {
                    guild_id,
                    id,
                    control: Arc::clone(&control),
                };

                info!("Starting playback session {} for guild {}", id, guild_id);
                let task = tokio::spawn(factory(ticket));
                entry.insert(SessionEntry { id, task, control });
                true
            }
        }
    }

    pub fn is_running(&self, guild_id: GuildId) -> bool {
        self.sessions
            .get(&guild_id)
            .is_some_and(|entry| !entry.task.is_finished())
    }

    /// Forget the guild's session without cancelling it
    pub fn remove(&self, guild_id: GuildId) -> bool {
        self.sessions.remove(&guild_id).is_some()
    }

    /// Deregister session `id`; a newer session for the same guild is left alone
    pub fn finish(&self, guild_id: GuildId, id: u64) -> bool {
        self.sessions
            .remove_if(&guild_id, |_, entry| entry.id == id)
            .is_some()
    }

    /// Cancel and forget the guild's session
    pub fn abort(&self, guild_id: GuildId) -> bool {
        match self.sessions.remove(&guild_id) {
            Some((_, entry)) => {
                info!("Aborting playback session {} for guild {}", entry.id, guild_id);
                entry.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn control(&self, guild_id: GuildId) -> Option<Arc<SessionControl>> {
        self.sessions
            .get(&guild_id)
            .map(|entry| Arc::clone(&entry.control))
    }

    pub fn request_skip(&self, guild_id: GuildId) {
        if let Some(control) = self.control(guild_id) {
            control.request_skip();
        }
    }

    pub fn request_stop(&self, guild_id: GuildId) {
        if let Some(control) = self.control(guild_id) {
            control.request_stop();
        }
    }

    /// The session's current track, only while it is in the `Playing` state
    pub async fn now_playing(&self, guild_id: GuildId) -> Option<Track> {
        let control = self.control(guild_id)?;
        if control.state() != SessionState::Playing {
            return None;
        }
        control.now_playing().await
    }
}
