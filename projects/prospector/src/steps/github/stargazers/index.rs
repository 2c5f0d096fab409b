use chrono::{DateTime, Utc};
use interfaces_github_stargazers::{
    index::{GitHubRequestError, GitHubRestClient},
    models::StarredEntry,
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::steps::github::{send_paced, RequestPacing};
use crate::steps::leads::models::Stargazer;

#[derive(Debug, Clone, Copy)]
pub struct StargazerPaging {
    pub per_page: u32,
    pub max_pages: u32,
}

#[derive(Debug, Error)]
pub enum FetchStargazerPageError {
    #[error("GitHubRequest: {source}")]
    GitHubRequest {
        #[from]
        source: GitHubRequestError,
    },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus {
        status: StatusCode,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

struct StargazerPage {
    entries: Vec<StarredEntry>,
    last_page: Option<u32>,
}

/// Collects the stargazers of `repo` who starred at or after `since`.
///
/// GitHub lists stargazers oldest first, so the walk starts at the last page and
/// moves back until a page reaches past `since`. A failing page ends the walk for
/// this repo only; whatever was gathered up to then is returned.
pub async fn fetch_recent_stargazers(
    client: &GitHubRestClient,
    repo: &str,
    since: DateTime<Utc>,
    paging: StargazerPaging,
    pacing: &RequestPacing,
) -> Vec<Stargazer> {
    info!(repo, "Fetching stargazers");

    let mut stargazers = Vec::new();

    let first = match fetch_page(client, repo, 1, paging.per_page, pacing).await {
        Ok(page) => page,
        Err(err) => {
            error!(repo, page = 1, "Error fetching stargazers: {err}");
            return stargazers;
        }
    };

    let last_page = first.last_page.unwrap_or(1).max(1);
    let mut pages_walked = 0;
    let mut page_number = last_page;
    let mut page = Some(first);

    while page_number >= 1 {
        if pages_walked >= paging.max_pages {
            warn!(repo, max_pages = paging.max_pages, "Hit page limit, stopping");
            break;
        }

        let cached = if page_number == 1 { page.take() } else { None };
        let entries = match cached {
            Some(cached) => cached.entries,
            None => {
                tokio::time::sleep(pacing.request_delay).await;
                match fetch_page(client, repo, page_number, paging.per_page, pacing).await {
                    Ok(fetched) => fetched.entries,
                    Err(err) => {
                        error!(repo, page = page_number, "Error fetching stargazers: {err}");
                        break;
                    }
                }
            }
        };
        pages_walked += 1;

        let (recent, reached_older) = recent_entries(entries, repo, since);
        stargazers.extend(recent);

        if reached_older {
            break;
        }
        page_number -= 1;
    }

    info!(repo, count = stargazers.len(), "Found recent stargazers");
    stargazers
}

/// Keeps entries starred at or after `since`, newest first. The flag reports
/// whether the page held anything older.
fn recent_entries(
    entries: Vec<StarredEntry>,
    repo: &str,
    since: DateTime<Utc>,
) -> (Vec<Stargazer>, bool) {
    let mut reached_older = false;
    let mut recent = Vec::new();

    for entry in entries.into_iter().rev() {
        let Some(starred_at) = entry.starred_at else {
            continue;
        };
        if starred_at < since {
            reached_older = true;
            continue;
        }
        recent.push(Stargazer {
            username: entry.user.login,
            starred_at,
            repo: repo.to_string(),
            user_url: entry.user.html_url,
        });
    }

    (recent, reached_older)
}

async fn fetch_page(
    client: &GitHubRestClient,
    repo: &str,
    page: u32,
    per_page: u32,
    pacing: &RequestPacing,
) -> Result<StargazerPage, FetchStargazerPageError> {
    let result = send_paced(pacing, repo, || client.fetch_repo_stargazers(repo, page, per_page)).await?;

    if result.status != StatusCode::OK {
        return Err(FetchStargazerPageError::UnexpectedStatus { status: result.status });
    }

    let entries: Vec<StarredEntry> = serde_json::from_str(&result.body)?;
    let last_page = result.link.as_deref().and_then(parse_last_page);

    Ok(StargazerPage { entries, last_page })
}

/// Reads the page number of the `rel="last"` entry of a GitHub `Link` header.
pub fn parse_last_page(link: &str) -> Option<u32> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_last = params
            .split(';')
            .any(|param| param.trim().replace(' ', "") == "rel=\"last\"");
        if !is_last {
            return None;
        }

        let url = target.trim().trim_start_matches('<').trim_end_matches('>');
        let query = url.split_once('?')?.1;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}
