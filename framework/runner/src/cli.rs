use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct BenchmarkCli {
    /// The address of the shop to benchmark, as `host` or `host:port`. A full URL is also accepted.
    #[clap(long, default_value = "127.0.0.1", value_parser = parse_target)]
    pub ip: String,

    /// The number of seconds to run the timed phase for, once validation has passed
    #[clap(long, default_value = "60")]
    pub duration: u64,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by
    /// anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// An identifier for this run, which is logged with the score. Generated if not set.
    #[clap(long)]
    pub run_id: Option<String>,
}

fn parse_target(s: &str) -> anyhow::Result<String> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("No target address specified");
    }

    if s.contains("://") {
        Ok(s.to_string())
    } else {
        Ok(format!("http://{s}"))
    }
}
