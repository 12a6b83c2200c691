//! Comment-triggered build dispatch.
//!
//! Receives raw GitHub events from a webhook receiver, resolves issue comments
//! to the job watching that pull request, matches the comment against the
//! job's triggers, checks the commenter is a collaborator and schedules a build.

pub mod authorization;
pub mod dispatcher;
pub mod matcher;
pub mod queue;
pub mod registry;
pub mod trigger;

pub use authorization::CollaboratorCheck;
pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use matcher::{CommentPattern, matches};
pub use queue::{BuildQueue, ScheduledBuild};
pub use registry::{JobRegistry, RegistryStats};
pub use trigger::TriggerLifecycle;
