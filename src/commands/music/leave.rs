use super::*;
use utils::messages;

/// Disconnect the bot from the voice channel
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if music(ctx).leave(guild_id).await? {
        reply(ctx, messages::LEFT).await
    } else {
        reply(ctx, messages::BOT_NOT_CONNECTED).await
    }
}
