//! Repository identities and the pull request keys jobs are watched under.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A GitHub repository, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The `owner/name` form GitHub uses for `full_name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepositoryRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::InvalidInput(format!(
                "expected repository as owner/name, got '{}'",
                s
            ))),
        }
    }
}

/// Lookup key for a watched pull request: owner, repository name and number.
///
/// Comparison is exact and case-sensitive on every component. Keys order by
/// owner, then repository, then pull request number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepositoryKey {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl RepositoryKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Derive the key a job watches from its source. Only pull request heads
    /// have one.
    pub fn for_source(source: &JobSource) -> Option<Self> {
        match source.head {
            Head::PullRequest { number } => {
                Some(Self::new(source.owner.clone(), source.repo.clone(), number))
            }
            Head::Branch { .. } => None,
        }
    }

    pub fn repository(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.clone(), self.repo.clone())
    }
}

impl std::fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.repo, self.number)
    }
}

impl std::str::FromStr for RepositoryKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::InvalidInput(format!(
                "expected key as owner/repo/number, got '{}'",
                s
            ))
        };

        let mut parts = s.split('/');
        let (Some(owner), Some(repo), Some(number), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(invalid());
        }

        let number = number.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(owner, repo, number))
    }
}

/// What a job builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Head {
    PullRequest { number: u64 },
    Branch { name: String },
}

/// Source-control configuration of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSource {
    pub owner: String,
    pub repo: String,
    pub head: Head,
}

impl JobSource {
    pub fn pull_request(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            head: Head::PullRequest { number },
        }
    }

    pub fn branch(
        owner: impl Into<String>,
        repo: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            head: Head::Branch { name: name.into() },
        }
    }

    pub fn repository(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.clone(), self.repo.clone())
    }
}

/// Read access to a repository's collaborator list.
#[async_trait]
pub trait CollaboratorApi: Send + Sync {
    /// Logins of every current collaborator on the repository.
    async fn list_collaborators(&self, repository: &RepositoryRef) -> Result<Vec<String>>;
}
