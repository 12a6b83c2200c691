//! Watched jobs and the comment triggers attached to them.

use serde::{Deserialize, Serialize};

use crate::{JobSource, RepositoryKey};

/// A comment trigger: one regular expression a comment body must match in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub comment_pattern: String,
}

impl TriggerRule {
    pub fn new(comment_pattern: impl Into<String>) -> Self {
        Self {
            comment_pattern: comment_pattern.into(),
        }
    }
}

/// A build job that can be started by comments on its pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedJob {
    /// Full job name, used in logs and build history.
    pub name: String,
    pub source: JobSource,
    pub triggers: Vec<TriggerRule>,
}

impl WatchedJob {
    pub fn new(name: impl Into<String>, source: JobSource, triggers: Vec<TriggerRule>) -> Self {
        Self {
            name: name.into(),
            source,
            triggers,
        }
    }

    /// Key of the pull request this job watches, if it builds one.
    pub fn key(&self) -> Option<RepositoryKey> {
        RepositoryKey::for_source(&self.source)
    }
}

/// What stopping a trigger does to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBehavior {
    /// Register the job again, leaving it watching its pull request.
    #[default]
    Reregister,
    /// Remove the job from the registry.
    Unregister,
}

impl std::str::FromStr for StopBehavior {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reregister" => Ok(StopBehavior::Reregister),
            "unregister" => Ok(StopBehavior::Unregister),
            _ => Err(format!("unknown stop behavior: {}", s)),
        }
    }
}
