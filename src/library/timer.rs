use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::time::Duration;

/// A single-slot timer. Scheduling replaces (and cancels) whatever was pending.
///
/// Each scheduled callback runs on its own thread which waits on a cancel
/// channel. Dropping the sender half disconnects the channel, so replacing or
/// dropping the timer cancels the pending callback.
#[derive(Debug, Default)]
pub struct Timer {
    cancel: Option<Sender<()>>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, after: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        self.cancel = Some(cancel_tx);

        std::thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(after) {
                callback();
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A `Timer` whose schedules are tagged with increasing keys.
///
/// Effects run on independent threads and may arrive out of order. A schedule
/// or cancel for a key older than the newest one seen is ignored, and a cancel
/// that overtakes its own schedule still wins.
#[derive(Debug, Default)]
pub struct KeyedTimer {
    timer: Timer,
    latest: u64,
}

impl KeyedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, key: u64, after: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if key <= self.latest {
            return;
        }
        self.latest = key;
        self.timer.schedule(after, callback);
    }

    pub fn cancel(&mut self, key: u64) {
        if key < self.latest {
            return;
        }
        self.latest = key;
        self.timer.cancel();
    }
}
