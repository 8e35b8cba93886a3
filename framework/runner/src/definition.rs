use std::time::Duration;

use shop_bench_core::prelude::{Deadline, ScenarioFlow};

use crate::cli::BenchmarkCli;
use crate::context::{AgentContext, RunnerContext, UserValuesConstraint};
use crate::report::ScoreboardConfig;

pub type HookResult = anyhow::Result<()>;
pub type BehaviourResult = anyhow::Result<ScenarioFlow>;

pub type GlobalHookMut<RV> = fn(&mut RunnerContext<RV>) -> HookResult;
pub type AgentBehaviour<RV, V> = fn(&mut AgentContext<RV, V>) -> BehaviourResult;

/// The number of agents the benchmark runs. Fixed, the score is only comparable between runs that
/// used the same number.
pub const DEFAULT_WORKERS: usize = 5;

#[derive(derive_more::Error, derive_more::Display, Debug)]
pub enum DefinitionError {
    #[display("No agent behaviour defined for benchmark [{name}]")]
    NoBehaviour { name: String },
    #[display("Benchmark [{name}] needs at least one worker")]
    NoWorkers { name: String },
}

/// How the end of the timed phase is decided.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DeadlinePolicy {
    /// Measured from the moment the setup hook has finished.
    AfterSetup(Duration),
    /// A fixed point in time, regardless of how long setup takes.
    Fixed(Deadline),
}

/// The builder for a benchmark definition.
///
/// This must be used at the start of a benchmark binary to define what the agents do.
pub struct BenchmarkDefinitionBuilder<RV: UserValuesConstraint, V: UserValuesConstraint> {
    /// The name of the benchmark.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: BenchmarkCli,
    workers: usize,
    deadline: DeadlinePolicy,
    scoreboard: Option<ScoreboardConfig>,
    /// Global setup hook. It runs once, before the deadline is computed and before any agents are
    /// started. An error here stops the benchmark.
    setup_fn: Option<GlobalHookMut<RV>>,
    /// The behaviours, in registration order. Agent `i` runs behaviour `i % behaviours.len()`.
    agent_behaviour: Vec<(String, AgentBehaviour<RV, V>)>,
}

pub(crate) struct BenchmarkDefinition<RV: UserValuesConstraint, V: UserValuesConstraint> {
    pub name: String,
    pub target_url: String,
    pub run_id: Option<String>,
    pub no_progress: bool,
    pub workers: usize,
    pub deadline: DeadlinePolicy,
    pub scoreboard: Option<ScoreboardConfig>,
    pub setup_fn: Option<GlobalHookMut<RV>>,
    pub agent_behaviour: Vec<(String, AgentBehaviour<RV, V>)>,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> BenchmarkDefinition<RV, V> {
    /// Round-robin assignment of behaviours to agents.
    pub(crate) fn behaviour_for(&self, agent_index: usize) -> (&str, AgentBehaviour<RV, V>) {
        let (name, behaviour) = &self.agent_behaviour[agent_index % self.agent_behaviour.len()];
        (name, *behaviour)
    }
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> BenchmarkDefinitionBuilder<RV, V> {
    /// Initialise a new benchmark definition from its name and the parsed command line.
    pub fn new(name: &str, cli: BenchmarkCli) -> Self {
        let duration = Duration::from_secs(cli.duration);
        Self {
            name: name.to_string(),
            cli,
            workers: DEFAULT_WORKERS,
            deadline: DeadlinePolicy::AfterSetup(duration),
            scoreboard: None,
            setup_fn: None,
            agent_behaviour: Vec::new(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Override the duration of the timed phase that was given on the command line.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.deadline = DeadlinePolicy::AfterSetup(duration);
        self
    }

    /// End the timed phase at a fixed deadline instead of a duration measured after setup.
    pub fn with_fixed_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = DeadlinePolicy::Fixed(deadline);
        self
    }

    /// Submit the final score to a scoreboard.
    pub fn with_scoreboard(mut self, scoreboard: Option<ScoreboardConfig>) -> Self {
        self.scoreboard = scoreboard;
        self
    }

    /// Set the global setup hook [BenchmarkDefinitionBuilder::setup_fn] for this benchmark.
    pub fn use_setup(mut self, setup_fn: GlobalHookMut<RV>) -> Self {
        self.setup_fn = Some(setup_fn);
        self
    }

    /// Register a named agent behaviour. Behaviours are handed out to agents in the order they are
    /// registered.
    pub fn use_named_agent_behaviour(
        mut self,
        name: &str,
        behaviour: AgentBehaviour<RV, V>,
    ) -> Self {
        if self.agent_behaviour.iter().any(|(n, _)| n == name) {
            panic!("Behaviour [{}] is already defined", name);
        }

        self.agent_behaviour.push((name.to_string(), behaviour));
        self
    }

    pub(crate) fn build(self) -> Result<BenchmarkDefinition<RV, V>, DefinitionError> {
        if self.agent_behaviour.is_empty() {
            return Err(DefinitionError::NoBehaviour { name: self.name });
        }
        if self.workers == 0 {
            return Err(DefinitionError::NoWorkers { name: self.name });
        }

        Ok(BenchmarkDefinition {
            name: self.name,
            target_url: self.cli.ip,
            run_id: self.cli.run_id,
            no_progress: self.cli.no_progress,
            workers: self.workers,
            deadline: self.deadline,
            scoreboard: self.scoreboard,
            setup_fn: self.setup_fn,
            agent_behaviour: self.agent_behaviour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Values;

    impl UserValuesConstraint for Values {}

    fn cli() -> BenchmarkCli {
        BenchmarkCli {
            ip: "http://127.0.0.1".to_string(),
            duration: 60,
            no_progress: true,
            run_id: None,
        }
    }

    fn noop(_: &mut AgentContext<Values, Values>) -> BehaviourResult {
        Ok(ScenarioFlow::Stop)
    }

    #[test]
    fn behaviours_are_assigned_round_robin() {
        let definition = BenchmarkDefinitionBuilder::<Values, Values>::new("test", cli())
            .use_named_agent_behaviour("a", noop)
            .use_named_agent_behaviour("b", noop)
            .use_named_agent_behaviour("c", noop)
            .build()
            .unwrap();

        let assigned = (0..7)
            .map(|i| definition.behaviour_for(i).0.to_string())
            .collect::<Vec<_>>();
        assert_eq!(vec!["a", "b", "c", "a", "b", "c", "a"], assigned);
        assert_eq!(DEFAULT_WORKERS, definition.workers);
    }

    #[test]
    fn no_behaviour_is_an_error() {
        let result = BenchmarkDefinitionBuilder::<Values, Values>::new("empty", cli()).build();
        assert_eq!(
            "No agent behaviour defined for benchmark [empty]",
            result.err().unwrap().to_string()
        );
    }

    #[test]
    fn zero_workers_is_an_error() {
        let result = BenchmarkDefinitionBuilder::<Values, Values>::new("idle", cli())
            .with_workers(0)
            .use_named_agent_behaviour("a", noop)
            .build();
        assert!(matches!(result, Err(DefinitionError::NoWorkers { .. })));
    }

    #[test]
    #[should_panic(expected = "Behaviour [a] is already defined")]
    fn duplicate_behaviour_panics() {
        let _ = BenchmarkDefinitionBuilder::<Values, Values>::new("dup", cli())
            .use_named_agent_behaviour("a", noop)
            .use_named_agent_behaviour("a", noop);
    }
}
