use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user who starred one of the watched repositories inside the lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stargazer {
    pub username: String,
    pub starred_at: DateTime<Utc>,
    pub repo: String,
    pub user_url: String,
}

/// A stargazer after deduplication, with every watched repo they starred.
#[derive(Debug, Clone, PartialEq)]
pub struct StarredUser {
    pub stargazer: Stargazer,
    pub repos_starred: Vec<String>,
}

/// Public profile fields copied from `GET /users/{username}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter: Option<String>,
    pub public_repos: Option<u32>,
    pub followers: Option<u32>,
}

/// One record as written to `leads.json` and posted to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub stargazer: Stargazer,
    #[serde(flatten)]
    pub details: UserDetails,
    pub company_clean: String,
    pub orgs: Vec<String>,
    pub org_count: usize,
    pub repos_starred: Vec<String>,
    pub score: u32,
}
