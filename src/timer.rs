//! Cancelable delayed actions.
//!
//! Holds at most one pending task. Scheduling a new one aborts the previous
//! task first, so two timers can never race to advance the same state.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`, replacing any pending task.
    /// Returns the generation number of the new task.
    pub fn schedule<F>(&mut self, delay: Duration, action: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!("Delayed task {} firing", generation);
            action.await;
        }));

        generation
    }

    /// Abort the pending task. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                if was_pending {
                    tracing::debug!("Cancelled delayed task {}", self.generation);
                }
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
