use super::*;
use utils::messages;

/// Resume the paused song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if music(ctx).resume(guild_id).await? {
        reply(ctx, messages::RESUMED).await
    } else {
        reply(ctx, messages::NOT_PAUSED).await
    }
}
