//! Build history endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use commentci_dispatch::ScheduledBuild;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_builds))
}

/// Builds scheduled by comments, newest first.
async fn list_builds(State(state): State<AppState>) -> Json<Vec<ScheduledBuild>> {
    Json(state.builds.history().await)
}
