use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// One-shot cooperative cancellation shared by the controller and its workers.
#[derive(Debug, Default)]
pub struct StopSignal {
    raised: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_raised() {
                return;
            }
            notified.await;
        }
    }
}
