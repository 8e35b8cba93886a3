use std::sync::Arc;

use parking_lot::Mutex;

use crate::deadline::Deadline;
use crate::score::Checkpoint;
use crate::wait_group::WorkerTicket;

/// The one-time side effect run when the deadline is first observed.
pub trait Finalize: Send + Sync {
    fn finalize(&self, total_score: i64);
}

impl<F> Finalize for F
where
    F: Fn(i64) + Send + Sync,
{
    fn finalize(&self, total_score: i64) {
        self(total_score)
    }
}

#[derive(Debug, Default)]
struct ScoreState {
    total_score: i64,
    finalized: bool,
}

/// The run-wide score, shared by every worker.
///
/// The total and the finalized latch sit behind the same lock so that the check of the latch and
/// the finalization it guards happen in one critical section.
pub struct ScoreAggregator {
    state: Mutex<ScoreState>,
    deadline: Deadline,
    finalizer: Box<dyn Finalize>,
}

impl std::fmt::Debug for ScoreAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreAggregator")
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl ScoreAggregator {
    pub fn new(deadline: Deadline, finalizer: impl Finalize + 'static) -> Self {
        Self {
            state: Mutex::new(ScoreState::default()),
            deadline,
            finalizer: Box::new(finalizer),
        }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Add a worker's batch to the total and check the deadline.
    ///
    /// Once the deadline has passed the worker's ticket is released and `true` is returned. The
    /// first caller to get there also runs the finalizer, before the lock is released.
    pub fn checkpoint(&self, batch: i64, ticket: &mut WorkerTicket) -> bool {
        let mut state = self.state.lock();
        state.total_score += batch;

        if !self.deadline.has_passed() {
            return false;
        }

        ticket.release();
        if !state.finalized {
            state.finalized = true;
            self.finalizer.finalize(state.total_score);
        }

        true
    }

    pub fn total_score(&self) -> i64 {
        self.state.lock().total_score
    }

    pub fn is_finalized(&self) -> bool {
        self.state.lock().finalized
    }
}

/// A worker's handle on the aggregator, carrying the ticket it releases when it stops.
#[derive(Debug)]
pub struct WorkerScore {
    aggregator: Arc<ScoreAggregator>,
    ticket: WorkerTicket,
}

impl WorkerScore {
    pub fn new(aggregator: Arc<ScoreAggregator>, ticket: WorkerTicket) -> Self {
        Self { aggregator, ticket }
    }

    pub fn is_released(&self) -> bool {
        self.ticket.is_released()
    }
}

impl Checkpoint for WorkerScore {
    fn checkpoint(&mut self, batch: i64) -> bool {
        self.aggregator.checkpoint(batch, &mut self.ticket)
    }
}
