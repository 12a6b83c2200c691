//! Registry of jobs watching pull requests.

use commentci_core::{RepositoryKey, WatchedJob};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lookup counters, exposed for health and inspection endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub registered: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Maps a pull request key to the job watching it.
///
/// Owned by the host process and shared by reference; safe for concurrent
/// reads and writes.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<RepositoryKey, Arc<WatchedJob>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the job watching `key`. Returns the job it replaced.
    pub fn register(&self, key: RepositoryKey, job: Arc<WatchedJob>) -> Option<Arc<WatchedJob>> {
        self.jobs.insert(key, job)
    }

    /// Remove the job watching `key`.
    pub fn unregister(&self, key: &RepositoryKey) -> Option<Arc<WatchedJob>> {
        self.jobs.remove(key).map(|(_, job)| job)
    }

    pub fn lookup(&self, key: &RepositoryKey) -> Option<Arc<WatchedJob>> {
        let found = self.jobs.get(key).map(|entry| Arc::clone(entry.value()));
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Snapshot of every registered key and job, sorted by key.
    pub fn entries(&self) -> Vec<(RepositoryKey, Arc<WatchedJob>)> {
        let mut entries: Vec<_> = self
            .jobs
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            registered: self.jobs.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
