use std::time::Duration;

/// Recommended error type for your benchmark `main` function and any shared behaviour code that
/// you write for hooks. This type is compatible with the [crate::definition::HookResult] type so
/// you can use `?` to propagate errors.
pub type BenchResult<T> = anyhow::Result<T>;

/// The outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: String,
    pub total_score: i64,
    pub workers: usize,
    /// Wall time from the first agent starting to the last one stopping.
    pub elapsed: Duration,
}
