//! Event dispatcher - turns issue comment webhooks into scheduled builds.

use commentci_core::{
    BuildCause, BuildScheduler, EventAction, GitHubEvent, IssueCommentEvent, RawEvent,
    RepositoryKey, TriggerRule, WatchedJob,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::authorization::CollaboratorCheck;
use crate::matcher;
use crate::registry::JobRegistry;

/// What the dispatcher did with one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DispatchOutcome {
    /// Not an issue comment event.
    UnsupportedEvent { event: GitHubEvent },
    /// An issue comment event whose action is neither created nor updated.
    IgnoredAction { action: EventAction },
    /// The payload could not be decoded.
    MalformedPayload,
    NoWatchingJob { key: RepositoryKey },
    NoMatchingTrigger { key: RepositoryKey, job: String },
    /// The commenter is not a collaborator, or the check failed.
    Denied {
        key: RepositoryKey,
        job: String,
        user: String,
    },
    Scheduled {
        key: RepositoryKey,
        job: String,
        cause: BuildCause,
    },
}

impl DispatchOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, DispatchOutcome::Scheduled { .. })
    }
}

/// Entry point for inbound GitHub events.
///
/// Holds no per-event state; one instance serves concurrent deliveries.
pub struct EventDispatcher {
    registry: Arc<JobRegistry>,
    collaborators: CollaboratorCheck,
    scheduler: Arc<dyn BuildScheduler>,
}

impl EventDispatcher {
    pub fn new(
        registry: Arc<JobRegistry>,
        collaborators: CollaboratorCheck,
        scheduler: Arc<dyn BuildScheduler>,
    ) -> Self {
        Self {
            registry,
            collaborators,
            scheduler,
        }
    }

    #[instrument(skip_all, fields(event = %event.kind, action = %event.action))]
    pub async fn handle(&self, event: RawEvent) -> DispatchOutcome {
        if event.kind != GitHubEvent::IssueComment {
            return DispatchOutcome::UnsupportedEvent { event: event.kind };
        }
        self.handle_issue_comment(event).await
    }

    async fn handle_issue_comment(&self, event: RawEvent) -> DispatchOutcome {
        match event.action {
            EventAction::Created | EventAction::Updated => {}
            action => return DispatchOutcome::IgnoredAction { action },
        }

        let comment = match IssueCommentEvent::from_github_payload(&event.payload) {
            Ok(comment) => comment,
            Err(e) => {
                error!(error = %e, "Unable to parse issue comment payload");
                return DispatchOutcome::MalformedPayload;
            }
        };

        let key = comment.key();

        let Some(job) = self.registry.lookup(&key) else {
            debug!(key = %key, "No job found matching key");
            return DispatchOutcome::NoWatchingJob { key };
        };

        let Some(trigger) = find_matching_trigger(&job, &comment) else {
            debug!(
                job = %job.name,
                comment_id = comment.comment_id,
                "No matching triggers could be found for this comment"
            );
            return DispatchOutcome::NoMatchingTrigger {
                key,
                job: job.name.clone(),
            };
        };

        if !self
            .collaborators
            .is_collaborator(&comment.repository, &comment.author)
            .await
        {
            warn!(
                job = %job.name,
                comment_id = comment.comment_id,
                user = %comment.author,
                "Comment author is not a collaborator and is not authorized to trigger a build"
            );
            return DispatchOutcome::Denied {
                key,
                job: job.name.clone(),
                user: comment.author,
            };
        }

        let cause = BuildCause::new(
            comment.author.clone(),
            comment.body.clone(),
            trigger.comment_pattern.clone(),
        );

        self.scheduler
            .schedule_build(Arc::clone(&job), cause.clone())
            .await;

        info!(
            job = %job.name,
            comment_id = comment.comment_id,
            user = %comment.author,
            pattern = %trigger.comment_pattern,
            "Job triggered by issue comment"
        );

        DispatchOutcome::Scheduled {
            key,
            job: job.name.clone(),
            cause,
        }
    }
}

/// First trigger whose pattern matches the whole comment body. Patterns that
/// fail to compile count as no match.
fn find_matching_trigger<'a>(
    job: &'a WatchedJob,
    comment: &IssueCommentEvent,
) -> Option<&'a TriggerRule> {
    job.triggers.iter().find(|trigger| {
        match matcher::matches(&trigger.comment_pattern, &comment.body) {
            Ok(true) => {
                debug!(
                    job = %job.name,
                    comment_id = comment.comment_id,
                    pattern = %trigger.comment_pattern,
                    "Comment matched pattern"
                );
                true
            }
            Ok(false) => {
                debug!(
                    job = %job.name,
                    comment_id = comment.comment_id,
                    pattern = %trigger.comment_pattern,
                    "Comment did not match pattern"
                );
                false
            }
            Err(e) => {
                error!(job = %job.name, error = %e, "Skipping invalid trigger pattern");
                false
            }
        }
    })
}
