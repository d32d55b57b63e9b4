//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across the integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::sync::{Arc, Once};
use std::time::Duration;
use tracing::Level;

use jukebox::commands::music::utils::music_manager::MusicManager;
use mocks::{FakeVoice, RecordingNotifier, ScriptedResolver};

static INIT: Once = Once::new();

/// Initialize tracing for tests
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// Everything a playback test needs, wired together around fakes
pub struct Harness {
    pub manager: Arc<MusicManager>,
    pub resolver: Arc<ScriptedResolver>,
    pub voice: Arc<FakeVoice>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(resolver: ScriptedResolver) -> Self {
        Self::with_poll_interval(resolver, Duration::from_millis(10))
    }

    pub fn with_poll_interval(resolver: ScriptedResolver, poll_interval: Duration) -> Self {
        init();
        let voice = Arc::new(FakeVoice::default());
        let resolver = Arc::new(resolver);
        let manager = Arc::new(MusicManager::new(
            resolver.clone(),
            voice.clone(),
            4,
            poll_interval,
        ));

        Self {
            manager,
            resolver,
            voice,
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for: {}", what);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
