//! Application state.

use commentci_core::{CollaboratorApi, StopBehavior};
use commentci_dispatch::{
    BuildQueue, CollaboratorCheck, EventDispatcher, JobRegistry, TriggerLifecycle,
};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
    pub lifecycle: Arc<TriggerLifecycle>,
    pub dispatcher: Arc<EventDispatcher>,
    pub builds: Arc<BuildQueue>,
}

impl AppState {
    pub fn new(
        collaborators: Arc<dyn CollaboratorApi>,
        on_stop: StopBehavior,
        history_limit: usize,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let builds = Arc::new(BuildQueue::new(history_limit));
        let lifecycle = Arc::new(TriggerLifecycle::new(registry.clone(), on_stop));
        let dispatcher = Arc::new(EventDispatcher::new(
            registry.clone(),
            CollaboratorCheck::new(collaborators),
            builds.clone(),
        ));

        Self {
            registry,
            lifecycle,
            dispatcher,
            builds,
        }
    }
}
