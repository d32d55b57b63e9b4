use super::*;
use tracing::info;
use utils::messages;

/// Add a song or playlist to the queue and play it
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL, playlist URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = guild_id(ctx)?;

    let channel_id = match user_voice_channel(ctx, guild_id) {
        Ok(channel_id) => channel_id,
        Err(_) => return reply(ctx, messages::PLAY_NEEDS_VOICE).await,
    };

    // Resolving a playlist can take a while
    ctx.defer_or_broadcast().await?;

    let music = music(ctx);
    music.join(guild_id, channel_id).await?;

    let notifier = channel_notifier(ctx);
    let report = music
        .enqueue_query(guild_id, &query, notifier.as_ref())
        .await;

    if report.added == 0 {
        return reply(ctx, messages::NO_SUITABLE_VIDEOS).await;
    }
    reply(ctx, messages::added_songs(report.added)).await?;

    music
        .ensure_session(guild_id, Some(channel_id), notifier)
        .await?;

    Ok(())
}
