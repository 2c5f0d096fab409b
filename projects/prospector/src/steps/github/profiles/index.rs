use interfaces_github_stargazers::{
    index::{GitHubRequestError, GitHubRestClient},
    models::{UserOrg, UserProfile},
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::steps::github::{send_paced, RequestPacing};
use crate::steps::leads::models::{Lead, StarredUser, UserDetails};

const COMPANY_SUFFIXES: [&str; 7] = [", Inc.", ", Inc", " Inc.", " Inc", " LLC", " Ltd", " Ltd."];

#[derive(Debug, Error)]
pub enum FetchProfileError {
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

async fn fetch_profile(
    client: &GitHubRestClient,
    username: &str,
    pacing: &RequestPacing,
) -> Result<UserProfile, FetchProfileError> {
    let result = send_paced(pacing, username, || client.fetch_user(username)).await?;
    if result.status != StatusCode::OK {
        return Err(FetchProfileError::UnexpectedStatus { status: result.status });
    }
    Ok(serde_json::from_str(&result.body)?)
}

async fn fetch_orgs(
    client: &GitHubRestClient,
    username: &str,
    pacing: &RequestPacing,
) -> Result<Vec<UserOrg>, FetchProfileError> {
    let result = send_paced(pacing, username, || client.fetch_user_orgs(username)).await?;
    if result.status != StatusCode::OK {
        return Err(FetchProfileError::UnexpectedStatus { status: result.status });
    }
    Ok(serde_json::from_str(&result.body)?)
}

/// Profile fields for `username`; empty when the profile can't be read.
pub async fn fetch_user_details(
    client: &GitHubRestClient,
    username: &str,
    pacing: &RequestPacing,
) -> UserDetails {
    match fetch_profile(client, username, pacing).await {
        Ok(profile) => UserDetails {
            name: profile.name,
            company: profile.company,
            email: profile.email,
            bio: profile.bio,
            location: profile.location,
            blog: profile.blog,
            twitter: profile.twitter_username,
            public_repos: profile.public_repos,
            followers: profile.followers,
        },
        Err(err) => {
            debug!(username, "No profile details: {err}");
            UserDetails::default()
        }
    }
}

/// Public organization logins for `username`; empty when they can't be read.
pub async fn fetch_user_orgs(
    client: &GitHubRestClient,
    username: &str,
    pacing: &RequestPacing,
) -> Vec<String> {
    match fetch_orgs(client, username, pacing).await {
        Ok(orgs) => orgs.into_iter().map(|org| org.login).collect(),
        Err(err) => {
            debug!(username, "No organizations: {err}");
            Vec::new()
        }
    }
}

/// Normalizes the free-text company field of a GitHub profile.
pub fn clean_company_name(company: Option<&str>) -> String {
    let Some(company) = company else {
        return String::new();
    };

    let company = company.trim();
    let mut company = company.strip_prefix('@').unwrap_or(company);

    for suffix in COMPANY_SUFFIXES {
        if let Some(stripped) = company.strip_suffix(suffix) {
            company = stripped;
        }
    }

    company.trim().to_string()
}

/// Turns deduplicated stargazers into unscored leads, one profile and org lookup each.
pub async fn enrich_stargazers(
    client: &GitHubRestClient,
    users: Vec<StarredUser>,
    pacing: &RequestPacing,
) -> Vec<Lead> {
    let total = users.len();
    info!(total, "Enriching users");

    let mut leads = Vec::with_capacity(total);
    for (i, user) in users.into_iter().enumerate() {
        let username = user.stargazer.username.clone();

        let details = fetch_user_details(client, &username, pacing).await;
        tokio::time::sleep(pacing.request_delay).await;

        let orgs = fetch_user_orgs(client, &username, pacing).await;
        tokio::time::sleep(pacing.request_delay).await;

        let company_clean = clean_company_name(details.company.as_deref());
        info!(
            "[{}/{}] {} -> {}",
            i + 1,
            total,
            username,
            if company_clean.is_empty() { "(no company)" } else { company_clean.as_str() }
        );

        leads.push(Lead {
            stargazer: user.stargazer,
            details,
            company_clean,
            org_count: orgs.len(),
            orgs,
            repos_starred: user.repos_starred,
            score: 0,
        });
    }

    leads
}
