pub mod profiles;
pub mod stargazers;

use std::future::Future;
use std::time::Duration;

use interfaces_github_stargazers::index::{GitHubRequestError, GitHubRestResult};
use reqwest::StatusCode;
use tracing::warn;

/// How the job spaces out its GitHub calls.
#[derive(Debug, Clone, Copy)]
pub struct RequestPacing {
    pub request_delay: Duration,
    pub rate_limit_wait: Duration,
    pub rate_limit_retries: u32,
}

/// GitHub answers 403 for an exhausted primary limit and 429 for secondary limits.
pub fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

/// Runs `call`, waiting out rate-limit responses up to `pacing.rate_limit_retries` times.
/// The last response is returned as-is, rate limited or not.
pub async fn send_paced<F, Fut>(
    pacing: &RequestPacing,
    what: &str,
    mut call: F,
) -> Result<GitHubRestResult, GitHubRequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GitHubRestResult, GitHubRequestError>>,
{
    let mut retries = 0;
    loop {
        let result = call().await?;
        if !is_rate_limited(result.status) || retries >= pacing.rate_limit_retries {
            return Ok(result);
        }

        retries += 1;
        warn!(
            what,
            status = result.status.as_u16(),
            retry = retries,
            wait_secs = pacing.rate_limit_wait.as_secs(),
            "Rate limited by GitHub, waiting"
        );
        tokio::time::sleep(pacing.rate_limit_wait).await;
    }
}
