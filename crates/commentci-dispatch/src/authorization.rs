//! Collaborator authorization for comment triggers.

use commentci_core::{CollaboratorApi, RepositoryRef};
use std::sync::Arc;
use tracing::{debug, error};

/// Decides whether a commenter may trigger builds on a repository.
///
/// Every check queries the collaborator API afresh. Lookup failures deny.
#[derive(Clone)]
pub struct CollaboratorCheck {
    api: Arc<dyn CollaboratorApi>,
}

impl CollaboratorCheck {
    pub fn new(api: Arc<dyn CollaboratorApi>) -> Self {
        Self { api }
    }

    pub async fn is_collaborator(&self, repository: &RepositoryRef, username: &str) -> bool {
        match self.api.list_collaborators(repository).await {
            Ok(collaborators) => {
                let found = collaborators.iter().any(|login| login == username);
                debug!(
                    repo = %repository,
                    user = %username,
                    collaborators = collaborators.len(),
                    authorized = found,
                    "Checked collaborator list"
                );
                found
            }
            Err(e) => {
                error!(
                    repo = %repository,
                    user = %username,
                    error = %e,
                    "Failed to list collaborators, denying"
                );
                false
            }
        }
    }
}
