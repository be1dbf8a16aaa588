//! Install-completion latch

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Two-state latch: initializing, then ready.
///
/// Created initializing. [`resolve`](Self::resolve) flips it to ready and it
/// stays there for the rest of the install cycle.
#[derive(Debug)]
pub struct ReadyGate {
    ready: watch::Sender<bool>,
    cycle: AtomicU64,
}

impl ReadyGate {
    #[must_use]
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self { ready, cycle: AtomicU64::new(0) }
    }

    /// Start a new install cycle and return its number.
    ///
    /// Arming an initializing gate keeps it as is, so waiters admitted before
    /// the first install are released by that install. Precondition: when
    /// the gate is already ready, no caller may be relying on it staying
    /// ready; re-arming is only valid between separate installs.
    pub fn arm(&self) -> u64 {
        let rearmed = self.ready.send_if_modified(|ready| std::mem::replace(ready, false));
        if rearmed {
            let cycle = self.cycle.fetch_add(1, Ordering::AcqRel) + 1;
            debug!(cycle, "ready gate re-armed");
            cycle
        } else {
            self.cycle.load(Ordering::Acquire)
        }
    }

    /// Flip to ready and release every waiter.
    pub fn resolve(&self) {
        if self.ready.send_if_modified(|ready| !std::mem::replace(ready, true)) {
            debug!(cycle = self.cycle.load(Ordering::Acquire), "ready gate resolved");
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Suspend until the gate is ready. Returns immediately when it already
    /// is.
    pub async fn wait_until_ready(&self) {
        let mut rx = self.ready.subscribe();
        // the sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}
