mod cli;
mod context;
mod definition;
mod init;
mod monitor;
mod progress;
mod report;
mod run;
mod types;

pub mod prelude {
    pub use crate::cli::BenchmarkCli;
    pub use crate::context::{AgentContext, RunnerContext, UserValuesConstraint};
    pub use crate::definition::{
        AgentBehaviour, BehaviourResult, BenchmarkDefinitionBuilder, DefinitionError, HookResult,
        DEFAULT_WORKERS,
    };
    pub use crate::init::init;
    pub use crate::report::{ResultReporter, ScoreSubmission, ScoreboardClient, ScoreboardConfig};
    pub use crate::run::run;
    pub use crate::types::{BenchResult, RunSummary};

    // Re-export the core types that behaviours work with, so that benchmarks only depend on the
    // runner.
    pub use shop_bench_core::prelude::*;
}
