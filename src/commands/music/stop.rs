use super::*;
use utils::messages;

/// Stop playback and clear the queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if music(ctx).stop(guild_id).await? {
        reply(ctx, messages::STOPPED).await
    } else {
        reply(ctx, messages::BOT_NOT_CONNECTED).await
    }
}
