use std::{fmt::Debug, sync::Arc};

use shop_bench_core::prelude::WorkerScore;

pub trait UserValuesConstraint: Default + Debug + Send + Sync + 'static {}

/// Run-wide state, shared read-only by every agent once the setup hook has run.
#[derive(Debug)]
pub struct RunnerContext<RV: UserValuesConstraint> {
    target_url: String,
    run_id: String,
    value: RV,
}

impl<RV: UserValuesConstraint> RunnerContext<RV> {
    pub fn new(target_url: String, run_id: String) -> Self {
        Self {
            target_url,
            run_id,
            value: Default::default(),
        }
    }

    /// The base URL of the shop under test.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn get_mut(&mut self) -> &mut RV {
        &mut self.value
    }

    pub fn get(&self) -> &RV {
        &self.value
    }
}

/// Per-agent state, owned by the agent's thread for the whole run.
#[derive(Debug)]
pub struct AgentContext<RV: UserValuesConstraint, V: UserValuesConstraint> {
    agent_index: usize,
    agent_name: String,
    behaviour_name: String,
    runner_context: Arc<RunnerContext<RV>>,
    score: WorkerScore,
    value: V,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> AgentContext<RV, V> {
    pub(crate) fn new(
        agent_index: usize,
        agent_name: String,
        behaviour_name: String,
        runner_context: Arc<RunnerContext<RV>>,
        score: WorkerScore,
    ) -> Self {
        Self {
            agent_index,
            agent_name,
            behaviour_name,
            runner_context,
            score,
            value: Default::default(),
        }
    }

    pub fn agent_index(&self) -> usize {
        self.agent_index
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// The name of the behaviour this agent was assigned.
    pub fn behaviour_name(&self) -> &str {
        &self.behaviour_name
    }

    pub fn runner_context(&self) -> &Arc<RunnerContext<RV>> {
        &self.runner_context
    }

    /// Where this agent flushes its score. Implements [shop_bench_core::prelude::Checkpoint].
    pub fn score_mut(&mut self) -> &mut WorkerScore {
        &mut self.score
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn get(&self) -> &V {
        &self.value
    }
}
