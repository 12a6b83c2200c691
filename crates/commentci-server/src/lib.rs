//! Webhook host for comment-triggered builds.
//!
//! Receives GitHub webhooks over HTTP, hands them to the event dispatcher,
//! and exposes the watched jobs and build history.

pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;
