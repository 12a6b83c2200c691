//! Build causes.

use serde::{Deserialize, Serialize};

/// Why a build was started: who commented, what they wrote, and which
/// trigger pattern matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCause {
    user_login: String,
    comment: String,
    trigger_pattern: String,
}

impl BuildCause {
    pub fn new(
        user_login: impl Into<String>,
        comment: impl Into<String>,
        trigger_pattern: impl Into<String>,
    ) -> Self {
        Self {
            user_login: user_login.into(),
            comment: comment.into(),
            trigger_pattern: trigger_pattern.into(),
        }
    }

    pub fn user_login(&self) -> &str {
        &self.user_login
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn trigger_pattern(&self) -> &str {
        &self.trigger_pattern
    }

    /// One-line summary shown in build history.
    pub fn short_description(&self) -> String {
        format!("Started by an IssueComment from user: {}", self.user_login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_description() {
        let cause = BuildCause::new("alice", "retest this please", "retest this please");
        assert_eq!(
            cause.short_description(),
            "Started by an IssueComment from user: alice"
        );
        assert_eq!(cause.user_login(), "alice");
        assert_eq!(cause.comment(), "retest this please");
        assert_eq!(cause.trigger_pattern(), "retest this please");
    }
}
