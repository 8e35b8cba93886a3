use std::time::Duration;

/// Why the shop was judged unfit to benchmark.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Failed to reset the shop: {source:#}")]
    Reset { source: anyhow::Error },

    #[error("Resetting the shop took {elapsed:?}, longer than the allowed {limit:?}")]
    ResetTimeout { elapsed: Duration, limit: Duration },

    #[error("Target unreachable while fetching {path}: {source:#}")]
    Unreachable { path: String, source: anyhow::Error },

    #[error("Dataset query failed: {source:#}")]
    Dataset { source: anyhow::Error },

    #[error("The shop rejected the {action} with status {status}")]
    Rejected { action: &'static str, status: u16 },

    #[error("Failed to inspect the {view} page: {source:#}")]
    Inspect {
        view: &'static str,
        source: anyhow::Error,
    },

    #[error("Invalid content on the {view} page ({context}): {}", mismatches.join("; "))]
    InvalidContent {
        view: &'static str,
        context: String,
        mismatches: Vec<String>,
    },
}
