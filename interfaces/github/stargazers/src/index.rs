use reqwest::{header::LINK, Client, RequestBuilder, StatusCode};
use thiserror::Error;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = "stargazer-prospector";
/// Adds `starred_at` to every stargazer entry.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
    pub link: Option<String>,
}

pub struct GitHubRestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubRestClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, BuildGitHubRestClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| BuildGitHubRestClientError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `repo` is `owner/name`.
    pub async fn fetch_repo_stargazers(
        &self,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        let url = format!("{}/repos/{repo}/stargazers", self.base_url);
        let request = self
            .client
            .get(url)
            .header("Accept", STAR_MEDIA_TYPE)
            .query(&[("per_page", per_page), ("page", page)]);

        self.send(request).await
    }

    pub async fn fetch_user(&self, username: &str) -> Result<GitHubRestResult, GitHubRequestError> {
        let url = format!("{}/users/{username}", self.base_url);
        let request = self.client.get(url).header("Accept", JSON_MEDIA_TYPE);

        self.send(request).await
    }

    pub async fn fetch_user_orgs(
        &self,
        username: &str,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        let url = format!("{}/users/{username}/orgs", self.base_url);
        let request = self.client.get(url).header("Accept", JSON_MEDIA_TYPE);

        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<GitHubRestResult, GitHubRequestError> {
        let mut request = request.header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| GitHubRequestError::RequestSend { source })?;

        let status = response.status();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|source| GitHubRequestError::ResponseRead { source })?;

        Ok(GitHubRestResult { body, status, link })
    }
}

#[derive(Debug, Error)]
pub enum BuildGitHubRestClientError {
    #[error("ClientBuild: {source}")]
    ClientBuild {
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum GitHubRequestError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
