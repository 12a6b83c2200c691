//! Read-only server queries.

use anyhow::{Context, Result, bail};
use serde_json::Value;

pub async fn jobs(api_url: &str) -> Result<()> {
    let body = get(api_url, "/api/v1/jobs").await?;

    let jobs = body["jobs"].as_array().cloned().unwrap_or_default();
    if jobs.is_empty() {
        println!("No jobs are watching comments");
    }
    for entry in &jobs {
        let triggers: Vec<&str> = entry["job"]["triggers"]
            .as_array()
            .map(|t| {
                t.iter()
                    .filter_map(|r| r["comment_pattern"].as_str())
                    .collect()
            })
            .unwrap_or_default();
        println!(
            "{}  {}  {:?}",
            entry["key"].as_str().unwrap_or("-"),
            entry["job"]["name"].as_str().unwrap_or("-"),
            triggers
        );
    }

    println!(
        "registered: {}  lookups: {} hits, {} misses",
        body["stats"]["registered"], body["stats"]["hits"], body["stats"]["misses"]
    );
    Ok(())
}

pub async fn builds(api_url: &str) -> Result<()> {
    let body = get(api_url, "/api/v1/builds").await?;

    let builds = body.as_array().cloned().unwrap_or_default();
    if builds.is_empty() {
        println!("No builds scheduled");
    }
    for build in &builds {
        println!(
            "{}  {}  {}  {}",
            build["queued_at"].as_str().unwrap_or("-"),
            build["id"].as_str().unwrap_or("-"),
            build["job"].as_str().unwrap_or("-"),
            build["description"].as_str().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn get(api_url: &str, path: &str) -> Result<Value> {
    let url = format!("{}{}", api_url.trim_end_matches('/'), path);
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    if !response.status().is_success() {
        bail!("Server returned {}", response.status());
    }

    Ok(response.json().await?)
}
