//! GitHub REST client for comment-triggered builds.
//!
//! Implements [`commentci_core::CollaboratorApi`] over the GitHub REST API.

pub mod client;

pub use client::{GitHubClient, GitHubCollaborator, GitHubError};
