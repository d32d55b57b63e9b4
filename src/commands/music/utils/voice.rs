//! The voice transport seam: the operations the playback core needs from a voice
//! connection, plus the songbird-backed implementation used by the bot.

use dashmap::DashMap;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::Songbird;
use songbird::input::{HttpRequest, Input};
use songbird::tracks::{PlayMode, TrackHandle};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::materializer::PlayableSource;

/// Failures of the voice connection itself. These end the guild's playback session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoiceError {
    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("Failed to leave voice channel: {0}")]
    Leave(String),

    #[error("Playback control failed: {0}")]
    Control(String),
}

/// Voice operations used by the playback core, one connection per guild
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Join (or move to) a voice channel
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), VoiceError>;

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), VoiceError>;

    async fn is_connected(&self, guild_id: GuildId) -> bool;

    /// Start playing `source`, replacing whatever was playing before
    async fn play(&self, guild_id: GuildId, source: PlayableSource) -> Result<(), VoiceError>;

    async fn pause(&self, guild_id: GuildId) -> Result<(), VoiceError>;

    async fn resume(&self, guild_id: GuildId) -> Result<(), VoiceError>;

    /// Stop the current track; the connection stays up
    async fn stop(&self, guild_id: GuildId) -> Result<(), VoiceError>;

    async fn is_playing(&self, guild_id: GuildId) -> bool;

    async fn is_paused(&self, guild_id: GuildId) -> bool;
}

/// `VoiceTransport` backed by a songbird manager registered with the serenity client
pub struct SongbirdTransport {
    songbird: Arc<Songbird>,
    http: reqwest::Client,
    volume: f32,
    // Handle of the most recently started track for each guild
    tracks: DashMap<GuildId, TrackHandle>,
}

impl SongbirdTransport {
    pub fn new(songbird: Arc<Songbird>, http: reqwest::Client, volume: f32) -> Self {
        Self {
            songbird,
            http,
            volume,
            tracks: DashMap::new(),
        }
    }

    fn current_track(&self, guild_id: GuildId) -> Option<TrackHandle> {
        // Clone so the map guard is not held across an await
        self.tracks.get(&guild_id).map(|handle| handle.clone())
    }

    async fn play_mode(&self, guild_id: GuildId) -> Option<PlayMode> {
        let handle = self.current_track(guild_id)?;
        handle.get_info().await.ok().map(|state| state.playing)
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), VoiceError> {
        info!("Joining voice channel {} in guild {}", channel_id, guild_id);
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map(|_| ())
            .map_err(|e| VoiceError::Join(e.to_string()))
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        if self.songbird.get(guild_id).is_none() {
            return Err(VoiceError::NotConnected);
        }

        if let Some((_, handle)) = self.tracks.remove(&guild_id) {
            let _ = handle.stop();
        }

        info!("Leaving voice channel in guild {}", guild_id);
        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| VoiceError::Leave(e.to_string()))
    }

    async fn is_connected(&self, guild_id: GuildId) -> bool {
        match self.songbird.get(guild_id) {
            Some(call) => call.lock().await.current_connection().is_some(),
            None => false,
        }
    }

    async fn play(&self, guild_id: GuildId, source: PlayableSource) -> Result<(), VoiceError> {
        let call = self
            .songbird
            .get(guild_id)
            .ok_or(VoiceError::NotConnected)?;

        let input: Input = HttpRequest::new(self.http.clone(), source.stream_url.clone()).into();

        let handle = {
            let mut handler = call.lock().await;
            if handler.current_connection().is_none() {
                return Err(VoiceError::NotConnected);
            }
            handler.stop();
            handler.play_input(input)
        };
        debug!("Started '{}' in guild {}", source.title, guild_id);

        if let Err(e) = handle.set_volume(self.volume) {
            warn!("Failed to set volume in guild {}: {}", guild_id, e);
        }
        self.tracks.insert(guild_id, handle);

        Ok(())
    }

    async fn pause(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        let handle = self.current_track(guild_id).ok_or(VoiceError::NotConnected)?;
        handle.pause().map_err(|e| VoiceError::Control(e.to_string()))
    }

    async fn resume(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        let handle = self.current_track(guild_id).ok_or(VoiceError::NotConnected)?;
        handle.play().map_err(|e| VoiceError::Control(e.to_string()))
    }

    async fn stop(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        match self.current_track(guild_id) {
            Some(handle) => match handle.stop() {
                Ok(()) => Ok(()),
                // A track that already finished has nothing to stop
                Err(e) => {
                    debug!("Stop on finished track in guild {}: {}", guild_id, e);
                    Ok(())
                }
            },
            None => Ok(()),
        }
    }

    async fn is_playing(&self, guild_id: GuildId) -> bool {
        matches!(self.play_mode(guild_id).await, Some(PlayMode::Play))
    }

    async fn is_paused(&self, guild_id: GuildId) -> bool {
        matches!(self.play_mode(guild_id).await, Some(PlayMode::Pause))
    }
}
