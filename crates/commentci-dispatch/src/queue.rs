//! In-process build queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use commentci_core::{BuildCause, BuildId, BuildScheduler, RepositoryKey, WatchedJob};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A build accepted by the queue.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledBuild {
    pub id: BuildId,
    pub job: String,
    pub key: Option<RepositoryKey>,
    pub description: String,
    pub cause: BuildCause,
    pub queued_at: DateTime<Utc>,
}

/// Records scheduled builds, keeping the most recent `limit`.
pub struct BuildQueue {
    history: Mutex<VecDeque<ScheduledBuild>>,
    limit: usize,
}

impl BuildQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(limit.min(1024))),
            limit: limit.max(1),
        }
    }

    /// Scheduled builds, newest first.
    pub async fn history(&self) -> Vec<ScheduledBuild> {
        self.history.lock().await.iter().rev().cloned().collect()
    }
}

#[async_trait]
impl BuildScheduler for BuildQueue {
    async fn schedule_build(&self, job: Arc<WatchedJob>, cause: BuildCause) {
        let build = ScheduledBuild {
            id: BuildId::new(),
            job: job.name.clone(),
            key: job.key(),
            description: cause.short_description(),
            cause,
            queued_at: Utc::now(),
        };

        info!(build_id = %build.id, job = %build.job, "Queued build");

        let mut history = self.history.lock().await;
        if history.len() >= self.limit {
            history.pop_front();
        }
        history.push_back(build);
    }
}
