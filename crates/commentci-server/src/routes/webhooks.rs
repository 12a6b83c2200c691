//! Webhook endpoint for GitHub.
//!
//! Deliveries are assumed to be authenticated upstream; this route only
//! extracts the event type and action and hands the payload to the dispatcher.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use commentci_core::{EventAction, GitHubEvent, RawEvent};
use commentci_dispatch::DispatchOutcome;
use tracing::{error, info};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/github", post(github_webhook))
}

/// Handle GitHub webhook events.
///
/// Every delivery is acknowledged; a body that cannot be read is logged and
/// dropped rather than reported back to GitHub.
async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<DispatchOutcome> {
    let kind = event_kind(&headers);

    let event = match raw_event(kind.clone(), &body) {
        Ok(event) => event,
        Err(reason) if kind == GitHubEvent::IssueComment => {
            error!(error = %reason, "Unable to parse issue comment payload");
            return Json(DispatchOutcome::MalformedPayload);
        }
        Err(_) => return Json(DispatchOutcome::UnsupportedEvent { event: kind }),
    };

    info!(
        event = %event.kind,
        action = %event.action,
        delivery = ?headers.get("X-GitHub-Delivery").and_then(|v| v.to_str().ok()),
        "Received GitHub webhook"
    );

    Json(state.dispatcher.handle(event).await)
}

fn event_kind(headers: &HeaderMap) -> GitHubEvent {
    headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .map(GitHubEvent::from)
        .unwrap_or_else(|| GitHubEvent::Other("unknown".to_string()))
}

/// Build a [`RawEvent`] from the delivery body. The payload is only probed for
/// its `action`; full decoding is the dispatcher's job.
fn raw_event(kind: GitHubEvent, body: &[u8]) -> Result<RawEvent, String> {
    let payload = std::str::from_utf8(body).map_err(|e| format!("invalid UTF-8: {}", e))?;

    let probe: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| format!("invalid JSON: {}", e))?;

    let action = probe
        .get("action")
        .and_then(|a| a.as_str())
        .map(EventAction::from)
        .unwrap_or_else(|| EventAction::Other(String::new()));

    Ok(RawEvent::new(kind, action, payload))
}
