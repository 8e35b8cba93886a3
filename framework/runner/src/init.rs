use crate::cli::BenchmarkCli;
use clap::Parser;

/// Initialise the CLI and logging for the benchmark runner.
///
/// Logs at `info` unless `RUST_LOG` says otherwise.
pub fn init() -> BenchmarkCli {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    BenchmarkCli::parse()
}
