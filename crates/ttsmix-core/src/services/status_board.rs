//! Status reporter holding the current message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use super::PipelineConfig;
use crate::job::JobStateMachine;
use crate::ports::{StatusMessage, StatusReporter};

struct BoardInner {
    tx: watch::Sender<Option<StatusMessage>>,
    /// Bumped on every report or clear; a pending auto-clear only fires if
    /// nothing superseded its message.
    generation: Mutex<u64>,
    clear_delay: Duration,
    job: Option<JobStateMachine>,
}

impl BoardInner {
    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the current status message and publishes it to subscribers.
///
/// Success messages clear themselves after the configured delay. When a job
/// is attached, that auto-clear also acknowledges a terminal job back to
/// `Idle`. Error and processing messages stay until superseded.
///
/// Auto-clear needs a Tokio runtime; outside one, success messages persist.
#[derive(Clone)]
pub struct StatusBoard {
    inner: Arc<BoardInner>,
}

impl StatusBoard {
    /// Create a board with the given auto-clear delay.
    pub fn new(clear_delay: Duration) -> Self {
        Self::build(clear_delay, None)
    }

    /// Create a board that acknowledges `job` whenever a success message
    /// auto-clears.
    pub fn for_job(clear_delay: Duration, job: JobStateMachine) -> Self {
        Self::build(clear_delay, Some(job))
    }

    /// Create a board from pipeline settings.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.status_clear_delay())
    }

    fn build(clear_delay: Duration, job: Option<JobStateMachine>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(BoardInner {
                tx,
                generation: Mutex::new(0),
                clear_delay,
                job,
            }),
        }
    }

    /// The message currently shown, if any.
    pub fn current(&self) -> Option<StatusMessage> {
        self.inner.tx.borrow().clone()
    }

    /// Watch the current message.
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.inner.tx.subscribe()
    }

    fn schedule_clear(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime available; success status will not auto-clear");
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(inner.clear_delay).await;

            let cleared = {
                let current = inner.generation();
                if *current == generation {
                    inner.tx.send_replace(None);
                }
                *current == generation
            };
            if !cleared {
                return;
            }

            if let Some(job) = &inner.job {
                if job.acknowledge() {
                    tracing::debug!("Terminal job acknowledged after status auto-clear");
                }
            }
        });
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl StatusReporter for StatusBoard {
    fn report(&self, message: StatusMessage) {
        tracing::debug!(kind = ?message.kind, text = %message.text, "Status");
        let auto_clears = message.auto_clears();

        let generation = {
            let mut current = self.inner.generation();
            *current += 1;
            self.inner.tx.send_replace(Some(message));
            *current
        };

        if auto_clears {
            self.schedule_clear(generation);
        }
    }

    fn clear(&self) {
        let mut current = self.inner.generation();
        *current += 1;
        self.inner.tx.send_replace(None);
    }
}

impl std::fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBoard")
            .field("current", &self.current())
            .field("clear_delay", &self.inner.clear_delay)
            .finish_non_exhaustive()
    }
}
