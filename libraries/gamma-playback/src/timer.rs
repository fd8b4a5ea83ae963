//! Cancellable one-shot timers
//!
//! A timer is a spawned task that sleeps until its deadline and then posts a
//! command into the controller's queue. It holds only a weak sender so a
//! pending timer never keeps a dropped controller alive.

use crate::controller::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    name: &'static str,
    task: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name, task: None }
    }

    /// Replace any scheduled fire with a new one
    pub(crate) fn schedule_at(
        &mut self,
        deadline: Instant,
        commands: mpsc::WeakSender<Command>,
        command: Command,
    ) {
        self.cancel();
        debug!(
            "Scheduling {} timer in {:?}",
            self.name,
            deadline.saturating_duration_since(Instant::now())
        );
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(command).await;
            }
        }));
    }

    /// Cancel the scheduled fire; no-op when nothing is scheduled
    pub(crate) fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_scheduled(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
