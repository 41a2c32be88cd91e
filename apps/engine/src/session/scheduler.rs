//! Cancellable delayed tasks, the only suspension point of a session.

use std::time::Duration;

/// Runs a task once after a delay. The task must not run synchronously inside
/// `schedule`: callers hold the session lock while scheduling.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> ScheduledTask;
}

/// Handle to a scheduled task. Dropping it cancels the task.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Release the handle without cancelling, e.g. from inside the task itself.
    pub fn disarm(&mut self) {
        self.cancel = None;
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Spawns onto the current tokio runtime; must be called from within one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> ScheduledTask {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        ScheduledTask::new(move || handle.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>) -> Box<dyn FnOnce() + Send> {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut task = TokioScheduler.schedule(Duration::from_millis(100), counting_task(&counter));

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        task.disarm();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent_and_prevents_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut task = TokioScheduler.schedule(Duration::from_millis(100), counting_task(&counter));
        task.cancel();
        task.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let counter = Arc::new(AtomicUsize::new(0));
        drop(TokioScheduler.schedule(Duration::from_millis(100), counting_task(&counter)));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
