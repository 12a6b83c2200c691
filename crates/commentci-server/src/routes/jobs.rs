//! Watched job endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use commentci_core::{RepositoryKey, StopBehavior, WatchedJob};
use commentci_dispatch::RegistryStats;
use serde::Serialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(start_job))
        .route("/stop", post(stop_job))
}

#[derive(Debug, Serialize)]
pub struct JobList {
    pub stats: RegistryStats,
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Serialize)]
pub struct JobEntry {
    pub key: String,
    pub job: WatchedJob,
}

#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    /// Key the job is registered under; `None` for jobs that do not build a
    /// pull request.
    pub key: Option<RepositoryKey>,
    pub on_stop: Option<StopBehavior>,
}

async fn list_jobs(State(state): State<AppState>) -> Json<JobList> {
    let jobs = state
        .registry
        .entries()
        .into_iter()
        .map(|(key, job)| JobEntry {
            key: key.to_string(),
            job: (*job).clone(),
        })
        .collect();

    Json(JobList {
        stats: state.registry.stats(),
        jobs,
    })
}

/// Start watching a job's pull request. Invalid trigger patterns are rejected.
async fn start_job(
    State(state): State<AppState>,
    Json(job): Json<WatchedJob>,
) -> Result<(StatusCode, Json<LifecycleResponse>), ApiError> {
    let name = job.name.clone();
    let key = state.lifecycle.start(job)?;

    info!(job = %name, key = ?key.as_ref().map(|k| k.to_string()), "Started job trigger");

    Ok((
        StatusCode::CREATED,
        Json(LifecycleResponse { key, on_stop: None }),
    ))
}

/// Stop a job's trigger. Re-registering a job with an invalid pattern is
/// rejected like a start.
async fn stop_job(
    State(state): State<AppState>,
    Json(job): Json<WatchedJob>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let on_stop = state.lifecycle.stop_behavior();
    let key = state.lifecycle.stop(job)?;

    Ok(Json(LifecycleResponse {
        key,
        on_stop: Some(on_stop),
    }))
}
