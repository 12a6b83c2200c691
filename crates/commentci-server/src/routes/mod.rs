//! API routes.

pub mod builds;
pub mod health;
pub mod jobs;
pub mod webhooks;

use crate::AppState;
use axum::Router;

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_router())
        .nest("/webhooks", webhooks::router())
        .merge(health::router())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/builds", builds::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use commentci_core::{CollaboratorApi, RepositoryRef, Result, StopBehavior};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    struct StaticCollaborators(Vec<&'static str>);

    #[async_trait]
    impl CollaboratorApi for StaticCollaborators {
        async fn list_collaborators(&self, _repository: &RepositoryRef) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    fn state(on_stop: StopBehavior) -> AppState {
        AppState::new(Arc::new(StaticCollaborators(vec!["alice"])), on_stop, 10)
    }

    fn job_json(patterns: &[&str]) -> Value {
        json!({
            "name": "app/PR-42",
            "source": {
                "owner": "acme",
                "repo": "app",
                "head": { "kind": "pull_request", "number": 42 }
            },
            "triggers": patterns
                .iter()
                .map(|p| json!({ "comment_pattern": p }))
                .collect::<Vec<_>>()
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn webhook(event: &str, body: &Value) -> Request<Body> {
        Request::post("/webhooks/github")
            .header("X-GitHub-Event", event)
            .header("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn comment(author: &str, body: &str) -> Value {
        json!({
            "action": "created",
            "issue": { "number": 42, "pull_request": {} },
            "comment": { "id": 9, "body": body, "user": { "login": author } },
            "repository": { "name": "app", "owner": { "login": "acme" } }
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_comment_webhook_schedules_build() {
        let state = state(StopBehavior::Reregister);
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/jobs", &job_json(&["retest this please"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(webhook("issue_comment", &comment("alice", "retest this please")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["outcome"], "scheduled");

        let response = app
            .oneshot(Request::get("/api/v1/builds").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let builds = json_body(response).await;
        assert_eq!(builds.as_array().unwrap().len(), 1);
        assert_eq!(builds[0]["job"], "app/PR-42");
        assert_eq!(builds[0]["cause"]["user_login"], "alice");
    }

    #[tokio::test]
    async fn test_denied_comment_is_still_accepted() {
        let app = router(state(StopBehavior::Reregister));
        app.clone()
            .oneshot(post_json("/api/v1/jobs", &job_json(&["retest"])))
            .await
            .unwrap();

        let response = app
            .oneshot(webhook("issue_comment", &comment("mallory", "retest")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["outcome"], "denied");
    }

    fn raw_webhook(event: &str, body: &'static str) -> Request<Body> {
        Request::post("/webhooks/github")
            .header("X-GitHub-Event", event)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unreadable_comment_payload_is_logged_and_dropped() {
        let state = state(StopBehavior::Reregister);
        let app = router(state.clone());
        app.clone()
            .oneshot(post_json("/api/v1/jobs", &job_json(&["retest"])))
            .await
            .unwrap();

        let response = app
            .oneshot(raw_webhook("issue_comment", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["outcome"], "malformed_payload");
        assert!(state.builds.history().await.is_empty());
        logs_assert(|lines: &[&str]| {
            let errors: Vec<_> = lines
                .iter()
                .filter(|line| line.contains("Unable to parse issue comment payload"))
                .collect();
            match errors.len() {
                1 => Ok(()),
                n => Err(format!("expected one log entry for the payload, got {}", n)),
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unreadable_payload_of_other_event_is_ignored() {
        let app = router(state(StopBehavior::Reregister));

        let response = app.oneshot(raw_webhook("push", "{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["outcome"], "unsupported_event");
        assert!(!logs_contain("Unable to parse issue comment payload"));
    }

    #[tokio::test]
    async fn test_invalid_trigger_pattern_is_rejected_at_registration() {
        let state = state(StopBehavior::Reregister);
        let app = router(state.clone());

        let response = app
            .oneshot(post_json("/api/v1/jobs", &job_json(&["retest("])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unregisters_when_configured() {
        let state = state(StopBehavior::Unregister);
        let app = router(state.clone());
        app.clone()
            .oneshot(post_json("/api/v1/jobs", &job_json(&["retest"])))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/jobs/stop", &job_json(&["retest"])))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["on_stop"], "unregister");

        let response = app
            .oneshot(Request::get("/api/v1/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let jobs = json_body(response).await;
        assert_eq!(jobs["jobs"].as_array().unwrap().len(), 0);
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_stop_rejects_invalid_trigger_pattern() {
        let state = state(StopBehavior::Reregister);
        let app = router(state.clone());

        let response = app
            .oneshot(post_json("/api/v1/jobs/stop", &job_json(&["retest("])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(state(StopBehavior::Reregister));

        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["registry"]["registered"], 0);
    }
}
