use std::time::{Duration, Instant};

/// The absolute point in time at which the timed phase of a run ends.
///
/// Computed once when the run starts and copied to every worker, so reading it needs no
/// synchronisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Self {
            at: Instant::now() + duration,
        }
    }

    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// A deadline that was already reached `ago` before now.
    pub fn passed_by(ago: Duration) -> Self {
        let now = Instant::now();
        Self {
            at: now.checked_sub(ago).unwrap_or(now),
        }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn has_passed(&self) -> bool {
        Instant::now() > self.at
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}
