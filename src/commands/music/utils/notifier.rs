use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tracing::warn;

/// Sends plain-text notices back to the chat while a guild's playback session runs
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivery failures are logged, never propagated into the player loop
    async fn notify(&self, message: &str);
}

/// Posts notices to the text channel a command was issued from
pub struct ChannelNotifier {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, message: &str) {
        if let Err(e) = self.channel_id.say(self.http.as_ref(), message).await {
            warn!("Failed to send notice to channel {}: {}", self.channel_id, e);
        }
    }
}
