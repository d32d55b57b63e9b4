use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Errors from running a job on the blocking pool
#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    #[error("worker pool is closed")]
    Closed,

    #[error("worker panicked or was cancelled: {0}")]
    Join(String),
}

/// A bounded pool for blocking work (resolver processes, network lookups).
///
/// Jobs run on tokio's blocking threads; the semaphore caps how many run at once.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` on a blocking thread once a worker slot is free.
    pub async fn run<F, T>(&self, job: F) -> Result<T, WorkerError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| WorkerError::Closed)?;

        debug!(
            "Worker slot acquired ({} of {} free)",
            self.permits.available_permits(),
            self.size
        );

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| WorkerError::Join(e.to_string()))
    }
}
