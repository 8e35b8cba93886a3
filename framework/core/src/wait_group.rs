use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Inner {
    pending: Mutex<usize>,
    all_done: Condvar,
}

impl Inner {
    fn done(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.all_done.notify_all();
        }
    }
}

/// A counting barrier that the runner waits on until every worker has released its ticket.
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more unit of work and hand out the ticket that completes it.
    pub fn ticket(&self) -> WorkerTicket {
        *self.inner.pending.lock() += 1;
        WorkerTicket {
            group: Some(self.inner.clone()),
        }
    }

    pub fn pending(&self) -> usize {
        *self.inner.pending.lock()
    }

    /// Block until every ticket has been released.
    pub fn wait(&self) {
        let mut pending = self.inner.pending.lock();
        while *pending > 0 {
            self.inner.all_done.wait(&mut pending);
        }
    }
}

/// One worker's share of a [WaitGroup].
///
/// Releasing is idempotent. A ticket that is dropped without having been released is released
/// then, so a worker that panics cannot leave the runner waiting forever.
#[derive(Debug)]
pub struct WorkerTicket {
    group: Option<Arc<Inner>>,
}

impl WorkerTicket {
    pub fn release(&mut self) {
        if let Some(group) = self.group.take() {
            group.done();
        }
    }

    pub fn is_released(&self) -> bool {
        self.group.is_none()
    }
}

impl Drop for WorkerTicket {
    fn drop(&mut self) {
        if self.group.is_some() {
            log::warn!("Worker exited without observing the deadline");
            self.release();
        }
    }
}
