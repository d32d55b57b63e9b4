pub mod join;
pub mod leave;
pub mod nowplaying;
pub mod pause;
pub mod play;
pub mod queue;
pub mod resume;
pub mod skip;
pub mod stop;

pub mod audio_sources;
pub mod utils;

use crate::{CommandResult, Context};
use poise::serenity_prelude::{ChannelId, GuildId};
use std::sync::Arc;
use utils::music_manager::{MusicError, MusicManager};
use utils::notifier::{ChannelNotifier, Notifier};

fn guild_id(ctx: Context<'_>) -> Result<GuildId, MusicError> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}

fn music(ctx: Context<'_>) -> &Arc<MusicManager> {
    &ctx.data().music
}

/// Get the voice channel ID that the invoking user is currently in
fn user_voice_channel(ctx: Context<'_>, guild_id: GuildId) -> Result<ChannelId, MusicError> {
    let guild = ctx
        .serenity_context()
        .cache
        .guild(guild_id)
        .ok_or(MusicError::NotInGuild)?;

    guild
        .voice_states
        .get(&ctx.author().id)
        .and_then(|voice_state| voice_state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}

/// Notices from the playback session go to the channel the command came from
fn channel_notifier(ctx: Context<'_>) -> Arc<dyn Notifier> {
    Arc::new(ChannelNotifier::new(
        ctx.serenity_context().http.clone(),
        ctx.channel_id(),
    ))
}

async fn reply(ctx: Context<'_>, text: impl Into<String>) -> CommandResult {
    ctx.say(text).await?;
    Ok(())
}
