use std::path::PathBuf;

use chrono::{Duration, Utc};
use interfaces_github_stargazers::index::{BuildGitHubRestClientError, GitHubRestClient};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::steps::clay::index::{send_to_clay, DeliveryOutcome, SendToClayError};
use crate::steps::github::profiles::index::enrich_stargazers;
use crate::steps::github::stargazers::index::{fetch_recent_stargazers, StargazerPaging};
use crate::steps::leads::models::Lead;
use crate::steps::leads::scoring::{dedupe_stargazers, score_leads};
use crate::steps::output::index::{log_top_leads, save_local, SaveLocalError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("BuildGitHubClient: {source}")]
    BuildGitHubClient {
        #[from]
        source: BuildGitHubRestClientError,
    },

    #[error("LookbackOutOfRange: {days} days")]
    LookbackOutOfRange {
        days: u32,
    },

    #[error("SaveLocal: {source}")]
    SaveLocal {
        #[from]
        source: SaveLocalError,
    },

    #[error("SendToClay: {source}")]
    SendToClay {
        #[from]
        source: SendToClayError,
    },
}

#[derive(Debug)]
pub struct RunSummary {
    pub stargazers_found: usize,
    pub leads: Vec<Lead>,
    pub output_path: Option<PathBuf>,
    pub delivery: DeliveryOutcome,
}

/// One full batch: fetch, dedupe, enrich, score, save, deliver.
pub async fn run(config: &Config) -> Result<RunSummary, RunError> {
    let github = GitHubRestClient::new(config.github_api_url.as_str(), config.github_token.clone())?;
    if github.is_authenticated() {
        info!("GitHub token configured (5000 requests/hour)");
    } else {
        warn!("No GitHub token, limited to 60 requests/hour. Set GITHUB_TOKEN for better rate limits");
    }

    let pacing = config.pacing();
    let paging = StargazerPaging {
        per_page: config.per_page,
        max_pages: config.max_pages,
    };

    let since = Duration::try_days(i64::from(config.lookback_days))
        .and_then(|lookback| Utc::now().checked_sub_signed(lookback))
        .ok_or(RunError::LookbackOutOfRange { days: config.lookback_days })?;
    info!(since = %since.date_naive(), repos = %config.repos.join(", "), "Looking for stargazers");

    let mut all_stargazers = Vec::new();
    for repo in &config.repos {
        let stargazers = fetch_recent_stargazers(&github, repo, since, paging, &pacing).await;
        all_stargazers.extend(stargazers);
        tokio::time::sleep(pacing.request_delay).await;
    }

    let stargazers_found = all_stargazers.len();
    info!(total = stargazers_found, "Stargazers found");

    if all_stargazers.is_empty() {
        info!("No stargazers found in the time period");
        return Ok(RunSummary {
            stargazers_found,
            leads: Vec::new(),
            output_path: None,
            delivery: DeliveryOutcome::Skipped,
        });
    }

    let users = dedupe_stargazers(all_stargazers);
    let leads = score_leads(enrich_stargazers(&github, users, &pacing).await);
    info!(count = leads.len(), "Final lead count");
    log_top_leads(&leads, config.top);

    let output_path = save_local(&config.output, &leads)?;

    let delivery = send_to_clay(
        &reqwest::Client::new(),
        config.webhook_url(),
        &leads,
        Utc::now(),
        config.webhook_retry(),
    )
    .await?;

    Ok(RunSummary {
        stargazers_found,
        leads,
        output_path: Some(output_path),
        delivery,
    })
}
