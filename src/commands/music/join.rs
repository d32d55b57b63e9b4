use super::*;
use utils::messages;

/// Join the voice channel you are in
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let channel_id = match user_voice_channel(ctx, guild_id) {
        Ok(channel_id) => channel_id,
        Err(_) => return reply(ctx, messages::USER_NOT_IN_VOICE).await,
    };

    music(ctx).join(guild_id, channel_id).await?;
    reply(ctx, messages::JOINED).await
}
