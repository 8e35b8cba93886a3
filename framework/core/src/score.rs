/// Score awarded for a successful response.
pub const SUCCESS_SCORE: i64 = 1;
/// Penalty for any non-200 status whose decimal form contains a `4`.
pub const CLIENT_ERROR_PENALTY: i64 = -20;
/// Penalty for every other status, including the transport failure sentinel.
pub const FAILURE_PENALTY: i64 = -50;

/// Convert a response status into a score delta.
///
/// The `4` rule works on the decimal text of the status rather than on the 4xx range, so a status
/// such as `145` is penalised as a client error too. Scoring is judged against exactly this rule.
pub fn classify(status: u16) -> i64 {
    if status == 200 {
        SUCCESS_SCORE
    } else if status.to_string().contains('4') {
        CLIENT_ERROR_PENALTY
    } else {
        FAILURE_PENALTY
    }
}

/// Score accumulated by one scenario between two checkpoints.
///
/// A batch belongs to a single worker and is flushed into the shared aggregator at checkpoints, so
/// that the aggregator lock is only taken once per batch of calls.
#[derive(Debug, Default)]
pub struct Batch {
    score: i64,
    calls: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one call.
    pub fn record(&mut self, status: u16) {
        self.score += classify(status);
        self.calls += 1;
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Flush the batch through a checkpoint, leaving it empty.
    ///
    /// Returns `true` when the checkpoint observed the deadline and the worker must stop.
    pub fn flush(&mut self, checkpoint: &mut dyn Checkpoint) -> bool {
        let score = std::mem::take(&mut self.score);
        let calls = std::mem::take(&mut self.calls);
        log::trace!("Flushing batch of {calls} calls with score {score}");
        checkpoint.checkpoint(score)
    }
}

/// A point where a scenario hands its accumulated score over and learns whether to stop.
pub trait Checkpoint {
    /// Add `batch` to the run's total. Returns `true` if the deadline has passed.
    fn checkpoint(&mut self, batch: i64) -> bool;
}

/// What a worker should do after one pass through its scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFlow {
    /// The scenario completed without reaching the deadline, run it again from the start.
    Restart,
    /// The deadline was observed at a checkpoint, the worker is done.
    Stop,
}

impl ScenarioFlow {
    pub fn from_stopped(stopped: bool) -> Self {
        if stopped {
            ScenarioFlow::Stop
        } else {
            ScenarioFlow::Restart
        }
    }
}
