use super::*;
use utils::messages;

/// Pause the currently playing song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if music(ctx).pause(guild_id).await? {
        reply(ctx, messages::PAUSED).await
    } else {
        reply(ctx, messages::NOTHING_PLAYING).await
    }
}
