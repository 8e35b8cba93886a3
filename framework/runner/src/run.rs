use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use shop_bench_core::prelude::{
    Checkpoint, Deadline, ScenarioFlow, ScoreAggregator, WaitGroup, WorkerScore,
};

use crate::monitor::start_monitor;
use crate::progress::start_progress;
use crate::report::ResultReporter;
use crate::types::RunSummary;
use crate::{
    context::{AgentContext, RunnerContext, UserValuesConstraint},
    definition::{BenchmarkDefinitionBuilder, DeadlinePolicy},
};

pub fn run<RV: UserValuesConstraint, V: UserValuesConstraint>(
    definition: BenchmarkDefinitionBuilder<RV, V>,
) -> anyhow::Result<RunSummary> {
    let definition = definition.build()?;
    let run_id = definition
        .run_id
        .clone()
        .unwrap_or_else(|| nanoid::nanoid!());

    log::info!("Running benchmark: {} (run id {})", definition.name, run_id);

    let mut runner_context = RunnerContext::new(definition.target_url.clone(), run_id.clone());

    if let Some(setup_fn) = &definition.setup_fn {
        setup_fn(&mut runner_context)?;
    }

    // The clock only starts once setup, including any validation, has passed.
    let deadline = match definition.deadline {
        DeadlinePolicy::AfterSetup(duration) => Deadline::after(duration),
        DeadlinePolicy::Fixed(deadline) => deadline,
    };
    log::info!(
        "Benchmark start! Workers: {}, running for {}s",
        definition.workers,
        deadline.remaining().as_secs()
    );

    if !definition.no_progress {
        start_progress(deadline)?;
    }
    // Warn if the benchmarker competes with the target for CPU, which might lead to a misleading
    // score.
    start_monitor(deadline)?;

    let aggregator = Arc::new(ScoreAggregator::new(
        deadline,
        ResultReporter::new(definition.scoreboard.clone()),
    ));
    let wait_group = WaitGroup::new();
    let runner_context = Arc::new(runner_context);
    let started = Instant::now();

    let mut handles = Vec::with_capacity(definition.workers);
    for agent_index in 0..definition.workers {
        let runner_context = runner_context.clone();
        let (behaviour_name, behaviour) = definition.behaviour_for(agent_index);
        let behaviour_name = behaviour_name.to_string();
        let score = WorkerScore::new(aggregator.clone(), wait_group.ticket());

        let agent_name = format!("agent-{}", agent_index);
        log::debug!("Starting {} with behaviour {}", agent_name, behaviour_name);

        handles.push(
            std::thread::Builder::new()
                .name(agent_name.clone())
                .spawn(move || {
                    let mut context = AgentContext::new(
                        agent_index,
                        agent_name.clone(),
                        behaviour_name,
                        runner_context,
                        score,
                    );

                    loop {
                        match behaviour(&mut context) {
                            Ok(ScenarioFlow::Stop) => break,
                            Ok(ScenarioFlow::Restart) => {}
                            Err(e) => {
                                log::error!("Agent behaviour failed for {}: {:?}", agent_name, e);
                                // The iteration never reached a checkpoint, so check the deadline
                                // here instead.
                                if context.score_mut().checkpoint(0) {
                                    break;
                                }
                            }
                        }
                    }

                    log::debug!("Stopping agent {}", agent_name);
                })
                .context("Failed to spawn thread for benchmark agent")?,
        );
    }

    wait_group.wait();

    for handle in handles {
        handle
            .join()
            .map_err(|e| anyhow::anyhow!("Error joining thread for benchmark agent: {:?}", e))?;
    }

    let summary = RunSummary {
        run_id,
        total_score: aggregator.total_score(),
        workers: definition.workers,
        elapsed: started.elapsed(),
    };
    log::info!(
        "All agents stopped after {:.1}s, final score {}",
        summary.elapsed.as_secs_f64(),
        summary.total_score
    );

    Ok(summary)
}
