//! Trigger lifecycle - registers jobs as they start and stop watching.

use commentci_core::{RepositoryKey, Result, StopBehavior, WatchedJob};
use std::sync::Arc;
use tracing::{debug, info};

use crate::matcher::CommentPattern;
use crate::registry::JobRegistry;

/// Starts and stops comment triggers for jobs.
pub struct TriggerLifecycle {
    registry: Arc<JobRegistry>,
    on_stop: StopBehavior,
}

impl TriggerLifecycle {
    pub fn new(registry: Arc<JobRegistry>, on_stop: StopBehavior) -> Self {
        Self { registry, on_stop }
    }

    pub fn stop_behavior(&self) -> StopBehavior {
        self.on_stop
    }

    /// Start watching. Every trigger pattern is validated first; an invalid
    /// pattern leaves the registry untouched. Jobs that do not build a pull
    /// request are accepted but not registered.
    pub fn start(&self, job: WatchedJob) -> Result<Option<RepositoryKey>> {
        validate_triggers(&job)?;

        let Some(key) = job.key() else {
            debug!(job = %job.name, "Job does not build a pull request, not watching comments");
            return Ok(None);
        };

        info!(
            job = %job.name,
            key = %key,
            triggers = job.triggers.len(),
            "Watching pull request comments"
        );
        self.registry.register(key.clone(), Arc::new(job));
        Ok(Some(key))
    }

    /// Stop watching, according to the configured [`StopBehavior`]. When the
    /// job is re-registered its patterns are validated as in [`Self::start`].
    pub fn stop(&self, job: WatchedJob) -> Result<Option<RepositoryKey>> {
        let Some(key) = job.key() else {
            return Ok(None);
        };

        match self.on_stop {
            StopBehavior::Reregister => {
                validate_triggers(&job)?;
                debug!(job = %job.name, key = %key, "Trigger stopped, re-registering job");
                self.registry.register(key.clone(), Arc::new(job));
            }
            StopBehavior::Unregister => {
                info!(job = %job.name, key = %key, "Trigger stopped, no longer watching");
                self.registry.unregister(&key);
            }
        }

        Ok(Some(key))
    }
}

fn validate_triggers(job: &WatchedJob) -> Result<()> {
    for trigger in &job.triggers {
        CommentPattern::compile(&trigger.comment_pattern)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentci_core::{Error, JobSource, TriggerRule};

    fn pr_job(patterns: &[&str]) -> WatchedJob {
        WatchedJob::new(
            "app/PR-42",
            JobSource::pull_request("acme", "app", 42),
            patterns.iter().map(|p| TriggerRule::new(*p)).collect(),
        )
    }

    fn key() -> RepositoryKey {
        RepositoryKey::new("acme", "app", 42)
    }

    #[test]
    fn test_start_registers_pull_request_job() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::default());

        let registered = lifecycle.start(pr_job(&["retest"])).unwrap();

        assert_eq!(registered, Some(key()));
        assert_eq!(registry.lookup(&key()).unwrap().name, "app/PR-42");
    }

    #[test]
    fn test_start_ignores_branch_job() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::default());

        let job = WatchedJob::new(
            "app/main",
            JobSource::branch("acme", "app", "main"),
            vec![TriggerRule::new("retest")],
        );

        assert_eq!(lifecycle.start(job).unwrap(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_start_rejects_invalid_pattern() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::default());

        let err = lifecycle.start(pr_job(&["retest", "[unclosed"])).unwrap_err();

        assert!(matches!(err, Error::InvalidTriggerPattern { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stop_reregisters_by_default() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::default());
        lifecycle.start(pr_job(&["retest"])).unwrap();

        assert_eq!(lifecycle.stop(pr_job(&["retest"])).unwrap(), Some(key()));

        assert!(registry.lookup(&key()).is_some());
    }

    #[test]
    fn test_stop_registers_even_when_never_started() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::Reregister);

        lifecycle.stop(pr_job(&["retest"])).unwrap();

        assert!(registry.lookup(&key()).is_some());
    }

    #[test]
    fn test_stop_unregisters_when_configured() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::Unregister);
        lifecycle.start(pr_job(&["retest"])).unwrap();

        lifecycle.stop(pr_job(&["retest"])).unwrap();

        assert!(registry.lookup(&key()).is_none());
    }

    #[test]
    fn test_stop_rejects_invalid_pattern() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::Reregister);
        assert!(lifecycle.start(pr_job(&["retest("])).is_err());

        let err = lifecycle.stop(pr_job(&["retest("])).unwrap_err();

        assert!(matches!(err, Error::InvalidTriggerPattern { .. }));
        assert!(registry.lookup(&key()).is_none());
    }

    #[test]
    fn test_stop_keeps_registered_job_when_pattern_is_invalid() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::Reregister);
        lifecycle.start(pr_job(&["retest"])).unwrap();

        assert!(lifecycle.stop(pr_job(&["retest("])).is_err());

        let job = registry.lookup(&key()).unwrap();
        assert_eq!(job.triggers, vec![TriggerRule::new("retest")]);
    }

    #[test]
    fn test_stop_ignores_branch_job() {
        let registry = Arc::new(JobRegistry::new());
        let lifecycle = TriggerLifecycle::new(registry.clone(), StopBehavior::Reregister);
        let job = WatchedJob::new(
            "app/main",
            JobSource::branch("acme", "app", "main"),
            vec![TriggerRule::new("retest")],
        );

        assert_eq!(lifecycle.stop(job).unwrap(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stop_behavior_parse() {
        assert_eq!("reregister".parse(), Ok(StopBehavior::Reregister));
        assert_eq!("unregister".parse(), Ok(StopBehavior::Unregister));
        assert!("remove".parse::<StopBehavior>().is_err());
    }
}
