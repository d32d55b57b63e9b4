use super::*;
use utils::messages;

/// Show the currently playing song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn nowplaying(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    match music(ctx).now_playing(guild_id).await {
        Some(track) => reply(ctx, messages::now_playing(&track.title)).await,
        None => reply(ctx, messages::NOTHING_PLAYING).await,
    }
}
