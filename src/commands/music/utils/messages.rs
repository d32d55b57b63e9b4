//! User-facing reply texts for the music commands and player notices.

use std::fmt::Display;

use super::format_duration;
use crate::commands::music::audio_sources::Track;

pub const JOINED: &str = "Joined the voice channel!";
pub const USER_NOT_IN_VOICE: &str = "You are not connected to a voice channel.";
pub const PLAY_NEEDS_VOICE: &str = "You need to be in a voice channel to play music.";
pub const NO_SUITABLE_VIDEOS: &str =
    "No suitable videos found (they may be age-restricted or unavailable).";
pub const QUEUE_FINISHED: &str = "Queue is empty. Disconnecting from the voice channel.";
pub const SKIPPED: &str = "Skipped the song ⏭";
pub const NOTHING_PLAYING: &str = "No song is currently playing.";
pub const QUEUE_EMPTY: &str = "The queue is empty.";
pub const PAUSED: &str = "Paused ⏸";
pub const RESUMED: &str = "Resumed ⏯";
pub const NOT_PAUSED: &str = "The song is not paused.";
pub const STOPPED: &str = "Stopped ⏹ and cleared the queue.";
pub const BOT_NOT_CONNECTED: &str = "I'm not connected to a voice channel.";
pub const LEFT: &str = "Disconnected from the voice channel.";
pub const UNKNOWN_COMMAND: &str =
    "Sorry, I didn't recognize that command. Type `!help` to see all commands.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Discord rejects messages over 2000 characters; keep listings comfortably below
const MAX_LISTING_CHARS: usize = 1800;

pub fn added_songs(count: usize) -> String {
    format!("Added {} song(s) to the queue.", count)
}

pub fn could_not_process(title: &str, reason: impl Display) -> String {
    format!("Could not process '{}': {}", title, reason)
}

pub fn could_not_play(title: &str, reason: impl Display) -> String {
    format!("Could not play '{}': {}", title, reason)
}

pub fn now_playing(title: &str) -> String {
    format!("Now playing: {}", title)
}

pub fn missing_argument(command: &str) -> String {
    format!("Missing argument. Type `!help {}` for usage.", command)
}

pub fn command_failed(error: impl Display) -> String {
    format!("An error occurred while executing the command: {}", error)
}

/// Numbered listing of pending tracks, truncated to fit in one chat message
pub fn queue_listing(tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return QUEUE_EMPTY.to_string();
    }

    let mut message = String::from("**Song Queue:**\n");
    for (idx, track) in tracks.iter().enumerate() {
        let line = match track.duration {
            Some(duration) => format!(
                "{}. {} (`{}`)\n",
                idx + 1,
                track.title,
                format_duration(duration)
            ),
            None => format!("{}. {}\n", idx + 1, track.title),
        };

        if message.len() + line.len() > MAX_LISTING_CHARS {
            message.push_str(&format!("…and {} more\n", tracks.len() - idx));
            break;
        }
        message.push_str(&line);
    }
    message
}
