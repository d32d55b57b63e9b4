use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::messages;
use super::music_manager::{MusicError, MusicManager};
use super::notifier::Notifier;
use super::session_registry::{SessionState, SessionTicket};
use super::voice::VoiceError;

/// The per-guild player loop.
///
/// Pops tracks in FIFO order, materializes each one, hands it to the voice connection
/// and waits for it to end. When the queue is empty the session disconnects, deletes
/// the guild's queue and deregisters itself. A materialization failure skips only that
/// track; a voice failure, any other error or a panic ends the session through the
/// same cleanup path.
pub struct PlaybackSession {
    manager: Arc<MusicManager>,
    ticket: SessionTicket,
    notifier: Arc<dyn Notifier>,
}

impl PlaybackSession {
    pub fn new(
        manager: Arc<MusicManager>,
        ticket: SessionTicket,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            manager,
            ticket,
            notifier,
        }
    }

    pub async fn run(self) {
        let guild_id = self.ticket.guild_id;
        info!("Playback session {} started for guild {}", self.ticket.id, guild_id);

        loop {
            let outcome = AssertUnwindSafe(self.play_until_empty()).catch_unwind().await;

            let failed = match outcome {
                Ok(Ok(())) => false,
                Ok(Err(e)) => {
                    error!("Error in player loop for guild {}: {}", guild_id, e);
                    true
                }
                Err(_) => {
                    error!("Player loop panicked for guild {}", guild_id);
                    true
                }
            };

            if self.drain(failed).await {
                break;
            }
            debug!("Tracks arrived while draining guild {}, continuing", guild_id);
        }

        info!("Playback session {} ended for guild {}", self.ticket.id, guild_id);
    }

    async fn play_until_empty(&self) -> Result<(), MusicError> {
        let guild_id = self.ticket.guild_id;
        let control = &self.ticket.control;
        let transport = self.manager.transport();

        loop {
            // Read before popping: a `stop` clears the queue first, then bumps the epoch
            let epoch = control.stop_epoch();
            let Some(mut track) = self.manager.queues().pop_front(guild_id) else {
                break;
            };
            control.set_state(SessionState::Idle);

            let source = match self.manager.materializer().materialize(&mut track).await {
                Ok(source) => source,
                Err(e) => {
                    warn!("Skipping '{}' in guild {}: {}", track.title, guild_id, e);
                    self.notifier
                        .notify(&messages::could_not_play(&track.title, &e))
                        .await;
                    continue;
                }
            };

            if control.stop_epoch() != epoch {
                info!(
                    "Dropping '{}' in guild {}: playback was stopped",
                    track.title, guild_id
                );
                continue;
            }

            transport.play(guild_id, source).await?;
            control.set_state(SessionState::Playing);
            control.set_now_playing(Some(track.clone())).await;
            self.notifier.notify(&messages::now_playing(&track.title)).await;

            self.wait_for_track_end(epoch).await;
            control.set_now_playing(None).await;
            debug!("Finished '{}' in guild {}", track.title, guild_id);
        }

        control.set_state(SessionState::Idle);
        Ok(())
    }

    /// Poll until the transport is neither playing nor paused, or a skip is requested.
    /// A `stop` issued after `epoch` was read also ends the wait and silences the track.
    async fn wait_for_track_end(&self, epoch: u64) {
        let guild_id = self.ticket.guild_id;
        let control = &self.ticket.control;
        let transport = self.manager.transport();
        let interval = self.manager.poll_interval();

        loop {
            let skipped = control.skip_requested();
            tokio::pin!(skipped);
            skipped.as_mut().enable();

            if control.stop_epoch() != epoch {
                if let Err(e) = transport.stop(guild_id).await {
                    warn!("Failed to stop track in guild {}: {}", guild_id, e);
                }
                return;
            }

            if !transport.is_playing(guild_id).await && !transport.is_paused(guild_id).await {
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut skipped => {
                    debug!("Skip requested in guild {}", guild_id);
                    return;
                }
            }
        }
    }

    /// Tear the session down if the queue is still empty. Returns `false` when tracks
    /// were queued in the meantime and the session should keep playing.
    async fn drain(&self, force: bool) -> bool {
        let guild_id = self.ticket.guild_id;
        let control = &self.ticket.control;
        control.set_state(SessionState::Draining);
        control.set_now_playing(None).await;

        let lock = self.manager.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let queues = self.manager.queues();
        if force {
            queues.remove(guild_id);
        } else if !queues.remove_if_empty(guild_id) {
            control.set_state(SessionState::Idle);
            return false;
        }

        self.notifier.notify(messages::QUEUE_FINISHED).await;

        match self.manager.transport().disconnect(guild_id).await {
            Ok(()) => {}
            Err(VoiceError::NotConnected) => debug!("Guild {} already disconnected", guild_id),
            Err(e) => warn!("Failed to disconnect guild {}: {}", guild_id, e),
        }

        self.manager.sessions().finish(guild_id, self.ticket.id);
        control.set_state(SessionState::Terminated);
        true
    }
}
