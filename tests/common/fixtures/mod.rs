//! Test fixtures: ids and resolver output used across the integration tests

use jukebox::commands::music::audio_sources::MediaInfo;
use serenity::model::id::{ChannelId, GuildId};

pub const SAMPLE_GUILD_ID: u64 = 123456789;
pub const SAMPLE_VOICE_CHANNEL_ID: u64 = 987654321;

pub fn guild() -> GuildId {
    GuildId::new(SAMPLE_GUILD_ID)
}

pub fn voice_channel() -> ChannelId {
    ChannelId::new(SAMPLE_VOICE_CHANNEL_ID)
}

pub fn page_url(id: &str) -> String {
    format!("https://video.example/watch/{}", id)
}

/// Full extraction of a single video, as `yt-dlp -J --no-playlist` would return it
pub fn video(id: &str, title: &str) -> MediaInfo {
    MediaInfo {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        url: Some(format!("https://cdn.example/{}.webm", id)),
        webpage_url: Some(page_url(id)),
        duration: Some(180.0),
        entries: None,
    }
}

/// Flat playlist listing; each entry only carries an id, a title and its page URL
pub fn playlist(title: &str, items: &[(&str, &str)]) -> MediaInfo {
    let entries = items
        .iter()
        .map(|(id, title)| {
            Some(MediaInfo {
                id: Some(id.to_string()),
                title: Some(title.to_string()),
                url: Some(page_url(id)),
                ..Default::default()
            })
        })
        .collect();

    MediaInfo {
        title: Some(title.to_string()),
        entries: Some(entries),
        ..Default::default()
    }
}

/// Sample `yt-dlp -J --flat-playlist` output
pub const SAMPLE_PLAYLIST_JSON: &str = r#"{
    "id": "PL123",
    "title": "Road Trip",
    "_type": "playlist",
    "entries": [
        {"id": "aaa", "title": "First", "url": "https://www.youtube.com/watch?v=aaa", "duration": 212.0},
        null,
        {"id": "ccc", "title": "Third", "url": "ccc"}
    ]
}"#;
