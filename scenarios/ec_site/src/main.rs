use std::sync::Arc;

use anyhow::Context;
use ec_site_benchmark::scenario::{browsing, buying_spree, profile_watching};
use ec_site_benchmark::validation::ValidationGate;
use ec_site_benchmark::{AgentValues, BenchValues};
use shop_bench_client::prelude::{DatasetConfig, MysqlDataset, TargetClient};
use shop_bench_runner::prelude::*;

type Ctx = AgentContext<BenchValues, AgentValues>;

fn setup(ctx: &mut RunnerContext<BenchValues>) -> HookResult {
    let target = Arc::new(TargetClient::new(ctx.target_url())?);
    let dataset = Arc::new(
        MysqlDataset::connect(DatasetConfig::from_env()?)
            .context("Failed to connect to the shop database")?,
    );

    ValidationGate::new(target.as_ref(), dataset.as_ref()).run(&mut rand::thread_rng())?;

    *ctx.get_mut() = BenchValues::new(target, dataset);
    Ok(())
}

fn begin_iteration(ctx: &mut Ctx) {
    let iteration = ctx.get_mut().begin_iteration();
    log::trace!(
        "{} starting {} pass {}",
        ctx.agent_name(),
        ctx.behaviour_name(),
        iteration
    );
}

fn browsing_behaviour(ctx: &mut Ctx) -> BehaviourResult {
    begin_iteration(ctx);
    let runner_context = ctx.runner_context().clone();
    let values = runner_context.get();

    browsing(
        values.target()?,
        values.dataset()?,
        ctx.score_mut(),
        &mut rand::thread_rng(),
    )
}

fn profile_watching_behaviour(ctx: &mut Ctx) -> BehaviourResult {
    begin_iteration(ctx);
    let runner_context = ctx.runner_context().clone();
    let values = runner_context.get();

    profile_watching(values.target()?, ctx.score_mut(), &mut rand::thread_rng())
}

fn buying_spree_behaviour(ctx: &mut Ctx) -> BehaviourResult {
    begin_iteration(ctx);
    let runner_context = ctx.runner_context().clone();
    let values = runner_context.get();

    buying_spree(
        values.target()?,
        values.dataset()?,
        ctx.score_mut(),
        &mut rand::thread_rng(),
    )
}

fn main() -> BenchResult<()> {
    let cli = init();

    let builder =
        BenchmarkDefinitionBuilder::<BenchValues, AgentValues>::new(env!("CARGO_PKG_NAME"), cli)
            .with_scoreboard(ScoreboardConfig::from_env())
            .use_setup(setup)
            .use_named_agent_behaviour("browsing", browsing_behaviour)
            .use_named_agent_behaviour("profile-watching", profile_watching_behaviour)
            .use_named_agent_behaviour("buying-spree", buying_spree_behaviour);

    run(builder)?;

    Ok(())
}
