use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One entry of `GET /repos/{owner}/{name}/stargazers` in the star media type.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredEntry {
    pub starred_at: Option<DateTime<Utc>>,
    pub user: StargazerUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StargazerUser {
    pub login: String,
    pub html_url: String,
}

/// Subset of `GET /users/{username}` the job reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<u32>,
    pub followers: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserOrg {
    pub login: String,
}
