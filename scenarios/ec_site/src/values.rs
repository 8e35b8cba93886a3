use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use anyhow::Context;
use shop_bench_client::prelude::{Dataset, Target};
use shop_bench_runner::prelude::UserValuesConstraint;

/// Shared by every agent, filled in once the shop has passed validation.
#[derive(Default)]
pub struct BenchValues {
    target: Option<Arc<dyn Target>>,
    dataset: Option<Arc<dyn Dataset>>,
}

impl BenchValues {
    pub fn new(target: Arc<dyn Target>, dataset: Arc<dyn Dataset>) -> Self {
        Self {
            target: Some(target),
            dataset: Some(dataset),
        }
    }

    pub fn target(&self) -> anyhow::Result<&dyn Target> {
        self.target
            .as_deref()
            .context("Target client used before setup")
    }

    pub fn dataset(&self) -> anyhow::Result<&dyn Dataset> {
        self.dataset
            .as_deref()
            .context("Dataset used before setup")
    }
}

impl Debug for BenchValues {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchValues")
            .field("target", &self.target.is_some())
            .field("dataset", &self.dataset)
            .finish()
    }
}

impl UserValuesConstraint for BenchValues {}

/// Per-agent state, counting the scenario passes the agent has started.
#[derive(Debug, Default)]
pub struct AgentValues {
    iterations: usize,
}

impl AgentValues {
    /// Record the start of another pass and return its number, starting at 1.
    pub fn begin_iteration(&mut self) -> usize {
        self.iterations += 1;
        self.iterations
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl UserValuesConstraint for AgentValues {}
