use super::*;
use utils::messages;

/// Display the current song queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let tracks = music(ctx).queue_snapshot(guild_id);

    reply(ctx, messages::queue_listing(&tracks)).await
}
