//! Webhook replay.

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Post a saved payload to the server as if GitHub had delivered it.
pub async fn replay(api_url: &str, payload_path: &str, event: &str) -> Result<()> {
    let payload = std::fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read {}", payload_path))?;

    let url = format!("{}/webhooks/github", api_url.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .header("Content-Type", "application/json")
        .header("X-GitHub-Event", event)
        .body(payload)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        bail!("Server returned {}: {}", status, body);
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
