//! jukebox: a Discord bot that streams audio from web URLs into voice channels,
//! keeping one playback queue and one player loop per guild.

use std::sync::{Arc, LazyLock};

pub mod commands;
pub mod config;

use commands::music::utils::music_manager::MusicManager;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client used by the voice transport to open audio streams.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub music: Arc<MusicManager>,
}
