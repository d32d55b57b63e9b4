//! Fake implementations of the bot's external seams: the media resolver, the voice
//! connection and the chat notifier

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use jukebox::commands::music::audio_sources::{
    ExtractOptions, MediaInfo, MediaResolver, ResolutionError,
};
use jukebox::commands::music::utils::materializer::PlayableSource;
use jukebox::commands::music::utils::notifier::Notifier;
use jukebox::commands::music::utils::voice::{VoiceError, VoiceTransport};
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};

use super::fixtures;

/// Answers extraction requests from a fixed table.
///
/// Listing requests are looked up in the listings first and fall back to the single items,
/// which is what the real resolver does for a plain video URL.
#[derive(Default)]
pub struct ScriptedResolver {
    listings: HashMap<String, MediaInfo>,
    items: HashMap<String, Result<MediaInfo, ResolutionError>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedResolver {
    pub fn with_listing(mut self, query: &str, info: MediaInfo) -> Self {
        self.listings.insert(query.to_string(), info);
        self
    }

    pub fn with_item(mut self, query: &str, result: Result<MediaInfo, ResolutionError>) -> Self {
        self.items.insert(query.to_string(), result);
        self
    }

    /// Register a video under both its search query and its page URL
    pub fn with_video(self, query: &str, id: &str, title: &str) -> Self {
        let info = fixtures::video(id, title);
        self.with_item(&fixtures::page_url(id), Ok(info.clone()))
            .with_item(query, Ok(info))
    }

    /// Make every extraction of `query` block for `delay`, like a slow `yt-dlp` run
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    /// Number of extractions of `query` started so far
    pub fn calls(&self, query: &str) -> usize {
        self.calls.lock().unwrap().get(query).copied().unwrap_or(0)
    }
}

impl MediaResolver for ScriptedResolver {
    fn extract(&self, query: &str, options: ExtractOptions) -> Result<MediaInfo, ResolutionError> {
        *self.calls.lock().unwrap().entry(query.to_string()).or_default() += 1;

        if let Some(delay) = self.delays.get(query) {
            std::thread::sleep(*delay);
        }

        if options.flat {
            if let Some(listing) = self.listings.get(query) {
                return Ok(listing.clone());
            }
        }

        self.items
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(ResolutionError::Unavailable("Video unavailable".into())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
    Playing,
    Paused,
}

#[derive(Default)]
struct FakeGuild {
    connected: bool,
    mode: Option<FakeMode>,
}

/// In-memory voice connection. Tracks play until the test calls `finish_track` or
/// someone stops them.
#[derive(Default)]
pub struct FakeVoice {
    guilds: Mutex<HashMap<GuildId, FakeGuild>>,
    played: Mutex<Vec<String>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    fail_play: AtomicBool,
    fail_connect: AtomicBool,
}

impl FakeVoice {
    /// Make every subsequent `play` fail like a dropped voice connection
    pub fn fail_playback(&self) {
        self.fail_play.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `connect` fail like an unreachable voice server
    pub fn fail_connections(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    /// End the current track as if the audio ran out
    pub fn finish_track(&self, guild_id: GuildId) {
        if let Some(guild) = self.guilds.lock().unwrap().get_mut(&guild_id) {
            guild.mode = None;
        }
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn connected(&self, guild_id: GuildId) -> bool {
        self.guilds
            .lock()
            .unwrap()
            .get(&guild_id)
            .is_some_and(|guild| guild.connected)
    }

    pub fn mode(&self, guild_id: GuildId) -> Option<FakeMode> {
        self.guilds
            .lock()
            .unwrap()
            .get(&guild_id)
            .and_then(|guild| guild.mode)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceTransport for FakeVoice {
    async fn connect(&self, guild_id: GuildId, _channel_id: ChannelId) -> Result<(), VoiceError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(VoiceError::Join("voice server unreachable".into()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.guilds.lock().unwrap().entry(guild_id).or_default().connected = true;
        Ok(())
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        let mut guilds = self.guilds.lock().unwrap();
        match guilds.remove(&guild_id) {
            Some(guild) if guild.connected => {
                self.disconnects.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(VoiceError::NotConnected),
        }
    }

    async fn is_connected(&self, guild_id: GuildId) -> bool {
        self.connected(guild_id)
    }

    async fn play(&self, guild_id: GuildId, source: PlayableSource) -> Result<(), VoiceError> {
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(VoiceError::Control("voice websocket closed".into()));
        }

        let mut guilds = self.guilds.lock().unwrap();
        let guild = guilds
            .get_mut(&guild_id)
            .filter(|guild| guild.connected)
            .ok_or(VoiceError::NotConnected)?;
        guild.mode = Some(FakeMode::Playing);

        self.played.lock().unwrap().push(source.title);
        Ok(())
    }

    async fn pause(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        self.set_mode(guild_id, Some(FakeMode::Paused))
    }

    async fn resume(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        self.set_mode(guild_id, Some(FakeMode::Playing))
    }

    async fn stop(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        self.finish_track(guild_id);
        Ok(())
    }

    async fn is_playing(&self, guild_id: GuildId) -> bool {
        self.mode(guild_id) == Some(FakeMode::Playing)
    }

    async fn is_paused(&self, guild_id: GuildId) -> bool {
        self.mode(guild_id) == Some(FakeMode::Paused)
    }
}

impl FakeVoice {
    fn set_mode(&self, guild_id: GuildId, mode: Option<FakeMode>) -> Result<(), VoiceError> {
        let mut guilds = self.guilds.lock().unwrap();
        let guild = guilds.get_mut(&guild_id).ok_or(VoiceError::NotConnected)?;
        guild.mode = mode;
        Ok(())
    }
}

/// Collects every notice the bot would have posted to chat
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m == message)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
