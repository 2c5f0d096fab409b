use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::steps::clay::index::RetryPolicy;
use crate::steps::github::RequestPacing;

pub const DEFAULT_REPOS: [&str; 3] = [
    "amplitude/Amplitude-JavaScript",
    "mixpanel/mixpanel-js",
    "segmentio/analytics.js",
];

/// Batch job settings. Every flag can also come from the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prospector",
    version,
    about = "Finds recent stargazers of analytics SDK repos, scores them and forwards them to Clay"
)]
pub struct Config {
    /// GitHub token; without one the API allows 60 requests per hour.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "CLAY_WEBHOOK_URL", hide_env_values = true)]
    pub clay_webhook_url: Option<String>,

    /// Only stars newer than this many days are kept.
    #[arg(long, env = "LOOKBACK_DAYS", default_value_t = 30)]
    pub lookback_days: u32,

    /// Repository to watch, as owner/name. Repeat or comma-separate for several.
    #[arg(
        long = "repo",
        env = "PROSPECTOR_REPOS",
        value_delimiter = ',',
        value_parser = parse_repo,
        default_values = DEFAULT_REPOS
    )]
    pub repos: Vec<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = interfaces_github_stargazers::index::GITHUB_API_URL)]
    pub github_api_url: String,

    #[arg(
        long,
        env = "PROSPECTOR_PER_PAGE",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub per_page: u32,

    /// Pages walked per repository before giving up.
    #[arg(long, env = "PROSPECTOR_MAX_PAGES", default_value_t = 50)]
    pub max_pages: u32,

    /// Pause between consecutive GitHub requests.
    #[arg(long, env = "PROSPECTOR_REQUEST_DELAY_MS", default_value_t = 500)]
    pub request_delay_ms: u64,

    #[arg(long, env = "PROSPECTOR_RATE_LIMIT_WAIT_SECS", default_value_t = 60)]
    pub rate_limit_wait_secs: u64,

    #[arg(long, env = "PROSPECTOR_RATE_LIMIT_RETRIES", default_value_t = 3)]
    pub rate_limit_retries: u32,

    #[arg(long, env = "PROSPECTOR_OUTPUT", default_value = "leads.json")]
    pub output: PathBuf,

    /// Number of leads echoed to the log after scoring.
    #[arg(long, env = "PROSPECTOR_TOP", default_value_t = 10)]
    pub top: usize,

    #[arg(
        long,
        env = "PROSPECTOR_SKIP_WEBHOOK",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub skip_webhook: bool,

    #[arg(
        long,
        env = "PROSPECTOR_WEBHOOK_ATTEMPTS",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub webhook_attempts: u32,

    #[arg(long, env = "PROSPECTOR_WEBHOOK_RETRY_DELAY_MS", default_value_t = 2000)]
    pub webhook_retry_delay_ms: u64,

    #[arg(long, env = "PROSPECTOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn pacing(&self) -> RequestPacing {
        RequestPacing {
            request_delay: Duration::from_millis(self.request_delay_ms),
            rate_limit_wait: Duration::from_secs(self.rate_limit_wait_secs),
            rate_limit_retries: self.rate_limit_retries,
        }
    }

    pub fn webhook_retry(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.webhook_attempts,
            initial_delay: Duration::from_millis(self.webhook_retry_delay_ms),
        }
    }

    /// `None` when delivery is switched off or no URL is configured.
    pub fn webhook_url(&self) -> Option<&str> {
        if self.skip_webhook {
            return None;
        }
        self.clay_webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

fn parse_repo(value: &str) -> Result<String, String> {
    let value = value.trim();
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(value.to_string())
        }
        _ => Err(format!("expected owner/name, got `{value}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let mut argv = vec!["prospector"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv)
    }

    #[test]
    fn repo_values_accept_comma_lists() {
        let config = parse(&["--repo", "a/b,c/d", "--repo", "e/f"]).unwrap();
        assert_eq!(config.repos, vec!["a/b", "c/d", "e/f"]);
    }

    #[test]
    fn malformed_repo_is_rejected() {
        assert!(parse(&["--repo", "just-a-name"]).is_err());
        assert!(parse(&["--repo", "a/b/c"]).is_err());
        assert!(parse(&["--repo", "/b"]).is_err());
    }

    #[test]
    fn per_page_is_bounded_by_github_limit() {
        assert!(parse(&["--per-page", "0"]).is_err());
        assert!(parse(&["--per-page", "101"]).is_err());
        assert_eq!(parse(&["--per-page", "42"]).unwrap().per_page, 42);
    }

    #[test]
    fn skip_webhook_hides_url() {
        let mut config = parse(&["--clay-webhook-url", "https://hooks.example/x"]).unwrap();
        config.skip_webhook = false;
        assert_eq!(config.webhook_url(), Some("https://hooks.example/x"));

        config.skip_webhook = true;
        assert_eq!(config.webhook_url(), None);

        config.skip_webhook = false;
        config.clay_webhook_url = Some("  ".into());
        assert_eq!(config.webhook_url(), None);
    }

    #[test]
    fn skip_webhook_env_accepts_numeric_flags() {
        std::env::set_var("PROSPECTOR_SKIP_WEBHOOK", "1");
        let on = parse(&[]).map(|config| config.skip_webhook);
        std::env::set_var("PROSPECTOR_SKIP_WEBHOOK", "0");
        let off = parse(&[]).map(|config| config.skip_webhook);
        std::env::remove_var("PROSPECTOR_SKIP_WEBHOOK");

        assert!(on.unwrap());
        assert!(!off.unwrap());
    }

    #[test]
    fn durations_follow_flags() {
        let config = parse(&[
            "--request-delay-ms", "250",
            "--rate-limit-wait-secs", "5",
            "--webhook-retry-delay-ms", "10",
            "--webhook-attempts", "4",
        ])
        .unwrap();

        assert_eq!(config.pacing().request_delay, Duration::from_millis(250));
        assert_eq!(config.pacing().rate_limit_wait, Duration::from_secs(5));
        assert_eq!(config.webhook_retry().initial_delay, Duration::from_millis(10));
        assert_eq!(config.webhook_retry().max_attempts, 4);
    }
}
