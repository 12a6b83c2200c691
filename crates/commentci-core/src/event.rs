//! Inbound GitHub events and issue comment payload decoding.

use serde::{Deserialize, Serialize};

use crate::{RepositoryKey, RepositoryRef};

/// GitHub event type, as named by the `X-GitHub-Event` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitHubEvent {
    IssueComment,
    PullRequest,
    PullRequestReviewComment,
    CommitComment,
    Push,
    Ping,
    Other(String),
}

impl GitHubEvent {
    pub fn as_str(&self) -> &str {
        match self {
            GitHubEvent::IssueComment => "issue_comment",
            GitHubEvent::PullRequest => "pull_request",
            GitHubEvent::PullRequestReviewComment => "pull_request_review_comment",
            GitHubEvent::CommitComment => "commit_comment",
            GitHubEvent::Push => "push",
            GitHubEvent::Ping => "ping",
            GitHubEvent::Other(name) => name,
        }
    }
}

impl From<&str> for GitHubEvent {
    fn from(name: &str) -> Self {
        match name {
            "issue_comment" => GitHubEvent::IssueComment,
            "pull_request" => GitHubEvent::PullRequest,
            "pull_request_review_comment" => GitHubEvent::PullRequestReviewComment,
            "commit_comment" => GitHubEvent::CommitComment,
            "push" => GitHubEvent::Push,
            "ping" => GitHubEvent::Ping,
            other => GitHubEvent::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for GitHubEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the resource an event describes.
///
/// GitHub reports comment edits as `edited`; both `edited` and `updated`
/// map to [`EventAction::Updated`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
    Other(String),
}

impl EventAction {
    pub fn as_str(&self) -> &str {
        match self {
            EventAction::Created => "created",
            EventAction::Updated => "updated",
            EventAction::Deleted => "deleted",
            EventAction::Other(action) => action,
        }
    }
}

impl From<&str> for EventAction {
    fn from(action: &str) -> Self {
        match action {
            "created" => EventAction::Created,
            "edited" | "updated" => EventAction::Updated,
            "deleted" => EventAction::Deleted,
            other => EventAction::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound event as handed over by the webhook receiver, payload still
/// serialized.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub kind: GitHubEvent,
    pub action: EventAction,
    pub payload: String,
}

impl RawEvent {
    pub fn new(kind: GitHubEvent, action: EventAction, payload: impl Into<String>) -> Self {
        Self {
            kind,
            action,
            payload: payload.into(),
        }
    }
}

/// A decoded issue comment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub action: EventAction,
    pub repository: RepositoryRef,
    pub issue_number: u64,
    /// Set when the issue is a pull request.
    pub is_pull_request: bool,
    pub comment_id: u64,
    pub author: String,
    pub body: String,
}

impl IssueCommentEvent {
    /// Decode a GitHub `issue_comment` webhook payload.
    pub fn from_github_payload(payload: &str) -> Result<Self, serde_json::Error> {
        let payload: IssueCommentPayload = serde_json::from_str(payload)?;

        Ok(IssueCommentEvent {
            action: EventAction::from(payload.action.as_str()),
            repository: RepositoryRef::new(payload.repository.owner.login, payload.repository.name),
            issue_number: payload.issue.number,
            is_pull_request: payload.issue.pull_request.is_some(),
            comment_id: payload.comment.id,
            author: payload.comment.user.login,
            body: payload.comment.body,
        })
    }

    /// The key of the pull request this comment was made on.
    pub fn key(&self) -> RepositoryKey {
        RepositoryKey::new(
            self.repository.owner.clone(),
            self.repository.name.clone(),
            self.issue_number,
        )
    }
}

#[derive(Deserialize)]
struct IssueCommentPayload {
    action: String,
    issue: IssuePayload,
    comment: CommentPayload,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CommentPayload {
    id: u64,
    #[serde(default)]
    body: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    login: String,
}
