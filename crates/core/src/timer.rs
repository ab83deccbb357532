//! Timer scheduling for deferred session transitions.

use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::debug;

use crate::session::{Scheduled, TimerEvent};

/// Arms tokio tasks that deliver [`TimerEvent`]s after their delay.
///
/// Must be used from within a tokio runtime.
pub struct Scheduler {
    sender: mpsc::Sender<TimerEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Create a scheduler delivering expiries to `sender`.
    pub fn new(sender: mpsc::Sender<TimerEvent>) -> Self {
        Self {
            sender,
            pending: Vec::new(),
        }
    }

    /// Arm one timer.
    pub fn schedule(&mut self, scheduled: Scheduled) {
        self.pending.retain(|handle| !handle.is_finished());
        let sender = self.sender.clone();
        let Scheduled { event, delay } = scheduled;
        debug!(session = %event.session, kind = ?event.kind, delay_ms = delay.as_millis() as u64, "Timer armed");
        self.pending.push(tokio::spawn(async move {
            sleep(delay).await;
            if sender.send(event).await.is_err() {
                debug!(kind = ?event.kind, "Timer receiver closed");
            }
        }));
    }

    /// Abort every timer that has not fired yet.
    pub fn cancel_all(&mut self) {
        let count = self.pending.len();
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        if count > 0 {
            debug!(count, "Pending timers cancelled");
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
