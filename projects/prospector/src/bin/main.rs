use clap::Parser;
use thiserror::Error;
use tracing::info;

use projects_prospector::config::Config;
use projects_prospector::run::{run, RunError};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Run: {source}")]
    Run {
        #[source]
        source: RunError,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    // A missing .env is fine; the environment may already carry everything.
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    tracing_init(&config.log_level)
        .map_err(|source| MainError::TracingInit { source })?;

    info!("GitHub Stargazer Prospector");

    let summary = run(&config)
        .await
        .map_err(|source| MainError::Run { source })?;

    info!(
        stargazers = summary.stargazers_found,
        leads = summary.leads.len(),
        delivery = ?summary.delivery,
        "Done"
    );

    Ok(())
}
