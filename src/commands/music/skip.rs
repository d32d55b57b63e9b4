use super::*;
use utils::messages;

/// Skip the current song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if music(ctx).skip(guild_id).await? {
        reply(ctx, messages::SKIPPED).await
    } else {
        reply(ctx, messages::NOTHING_PLAYING).await
    }
}
