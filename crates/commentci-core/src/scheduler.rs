//! Build scheduler trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{BuildCause, WatchedJob};

/// Accepts build requests for watched jobs.
///
/// Scheduling is fire-and-forget: callers do not observe whether the build
/// was accepted, and failures belong to the scheduler.
#[async_trait]
pub trait BuildScheduler: Send + Sync {
    async fn schedule_build(&self, job: Arc<WatchedJob>, cause: BuildCause);
}
