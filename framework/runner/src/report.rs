use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use serde::Serialize;
use shop_bench_core::prelude::Finalize;

/// Scores are timestamped in Japan Standard Time.
const SCOREBOARD_UTC_OFFSET_SECS: i32 = 9 * 3600;
const SCOREBOARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to submit the final score. Only present when both values are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardConfig {
    pub api_url: String,
    pub team: String,
}

impl ScoreboardConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_url = lookup("BENCH_SCOREBOARD_APIGW_URL").filter(|v| !v.is_empty())?;
        let team = lookup("BENCH_TEAM_NAME").filter(|v| !v.is_empty())?;

        Some(Self { api_url, team })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    pub team: String,
    pub score: i64,
    pub timestamp: String,
}

pub struct ScoreboardClient {
    config: ScoreboardConfig,
    agent: ureq::Agent,
}

impl std::fmt::Debug for ScoreboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreboardClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoreboardClient {
    pub fn new(config: ScoreboardConfig) -> Self {
        let agent = ureq::config::Config::builder()
            .timeout_global(Some(SCOREBOARD_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self { config, agent }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/teams", self.config.api_url.trim_end_matches('/'))
    }

    pub fn submission(&self, score: i64, now: DateTime<Utc>) -> ScoreSubmission {
        let offset = FixedOffset::east_opt(SCOREBOARD_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());

        ScoreSubmission {
            team: self.config.team.clone(),
            score,
            timestamp: now
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    pub fn submit(&self, score: i64) -> anyhow::Result<()> {
        let submission = self.submission(score, Utc::now());
        let body = serde_json::to_string(&submission).context("Failed to serialize score")?;

        let response = self
            .agent
            .put(&self.endpoint())
            .header("Content-Type", "application/json")
            .send(body)
            .context("Failed to send score")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Scoreboard rejected score with status code {}", status.as_u16());
        }

        log::info!(
            "Sent score to scoreboard: {} (Team: {}, Score: {})",
            status.as_u16(),
            submission.team,
            submission.score
        );
        Ok(())
    }
}

/// Finalization for a run: log the score and hand it to the scoreboard if one is configured.
///
/// A scoreboard failure is logged and otherwise ignored, it never fails the run.
#[derive(Debug, Default)]
pub struct ResultReporter {
    scoreboard: Option<ScoreboardClient>,
}

impl ResultReporter {
    pub fn new(scoreboard: Option<ScoreboardConfig>) -> Self {
        Self {
            scoreboard: scoreboard.map(ScoreboardClient::new),
        }
    }
}

impl Finalize for ResultReporter {
    fn finalize(&self, total_score: i64) {
        log::info!("Benchmark finished");
        log::info!("Score: {total_score}");
        log::info!("Waiting for all agents to stop...");

        match &self.scoreboard {
            Some(scoreboard) => {
                if let Err(e) = scoreboard.submit(total_score) {
                    log::warn!("Failed to submit score to {}: {e:#}", scoreboard.endpoint());
                }
            }
            None => log::debug!("No scoreboard configured, not submitting score"),
        }
    }
}
