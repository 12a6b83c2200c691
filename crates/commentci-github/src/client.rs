//! GitHub API client for collaborator lookups.

use async_trait::async_trait;
use commentci_core::{CollaboratorApi, Error, RepositoryRef};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "commentci";
const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGES: u32 = 100;

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
    page_size: u32,
}

impl GitHubClient {
    pub fn new(api_url: &str, access_token: Option<String>) -> Result<Self, GitHubError> {
        let parsed = Url::parse(api_url).map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GitHubError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the number of collaborators requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// List every collaborator on a repository, following pages until a
    /// short page is returned.
    pub async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<GitHubCollaborator>, GitHubError> {
        let url = format!("{}/repos/{}/{}/collaborators", self.api_url, owner, repo);
        let mut collaborators = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut request = self
                .client
                .get(&url)
                .query(&[("per_page", self.page_size), ("page", page)])
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github+json");

            if let Some(token) = &self.access_token {
                request = request.header("Authorization", format!("Bearer {}", token));
            }

            let response = request
                .send()
                .await
                .map_err(|e| GitHubError::Request(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(GitHubError::Api(format!(
                    "Failed to list collaborators ({}): {}",
                    status, text
                )));
            }

            let batch: Vec<GitHubCollaborator> = response
                .json()
                .await
                .map_err(|e| GitHubError::Parse(e.to_string()))?;

            let fetched = batch.len();
            collaborators.extend(batch);

            if fetched < self.page_size as usize {
                break;
            }
        }

        debug!(
            repo = %format!("{}/{}", owner, repo),
            count = collaborators.len(),
            "Listed collaborators"
        );

        Ok(collaborators)
    }
}

#[async_trait]
impl CollaboratorApi for GitHubClient {
    async fn list_collaborators(
        &self,
        repository: &RepositoryRef,
    ) -> commentci_core::Result<Vec<String>> {
        let collaborators = GitHubClient::list_collaborators(self, &repository.owner, &repository.name)
            .await
            .map_err(Error::from)?;

        Ok(collaborators.into_iter().map(|c| c.login).collect())
    }
}

/// A repository collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCollaborator {
    pub login: String,
    pub id: i64,
}

/// GitHub API errors.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<GitHubError> for Error {
    fn from(err: GitHubError) -> Self {
        Error::CollaboratorLookup(err.to_string())
    }
}
