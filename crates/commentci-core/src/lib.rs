//! Core domain types and traits for comment-triggered builds.
//!
//! This crate contains:
//! - Repository and pull request keys
//! - Inbound GitHub event types and payload decoding
//! - Watched jobs and their trigger rules
//! - Build causes and build identifiers
//! - Port traits for the collaborator API and the build scheduler

pub mod cause;
pub mod error;
pub mod event;
pub mod id;
pub mod job;
pub mod repository;
pub mod scheduler;

pub use cause::BuildCause;
pub use error::{Error, Result};
pub use event::{EventAction, GitHubEvent, IssueCommentEvent, RawEvent};
pub use id::BuildId;
pub use job::{StopBehavior, TriggerRule, WatchedJob};
pub use repository::{CollaboratorApi, Head, JobSource, RepositoryKey, RepositoryRef};
pub use scheduler::BuildScheduler;
