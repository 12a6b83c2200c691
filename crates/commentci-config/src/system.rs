//! System configuration parsing (`commentci.kdl`).
//!
//! ```kdl
//! server { listen "0.0.0.0:3000" }
//! github { api-url "https://api.github.com"; token-env "GITHUB_TOKEN" }
//! registry { on-stop "reregister"; history-limit 100 }
//! job "app/PR-42" {
//!     repository "acme/app"
//!     pull-request 42
//!     trigger "retest this please"
//! }
//! ```

use crate::{ConfigError, ConfigResult};
use commentci_core::{JobSource, RepositoryRef, StopBehavior, TriggerRule, WatchedJob};
use commentci_dispatch::CommentPattern;
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use url::Url;

const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Complete configuration of a host process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCiConfig {
    pub server: ServerSettings,
    pub github: GitHubSettings,
    pub registry: RegistrySettings,
    /// Jobs to start watching at startup.
    pub jobs: Vec<WatchedJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    pub api_url: Url,
    /// Environment variable holding the API token.
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    pub on_stop: StopBehavior,
    /// Number of scheduled builds kept in history.
    pub history_limit: usize,
}

impl Default for CommentCiConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            },
            github: GitHubSettings {
                api_url: default_api_url(),
                token_env: DEFAULT_TOKEN_ENV.to_string(),
            },
            registry: RegistrySettings {
                on_stop: StopBehavior::default(),
                history_limit: DEFAULT_HISTORY_LIMIT,
            },
            jobs: Vec::new(),
        }
    }
}

/// Read and parse a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<CommentCiConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from KDL text.
pub fn parse_config(kdl: &str) -> ConfigResult<CommentCiConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = CommentCiConfig::default();

    let mut job_names = HashSet::new();
    let mut job_keys = HashSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "server" => parse_server(node, &mut config.server)?,
            "github" => parse_github(node, &mut config.github)?,
            "registry" => parse_registry(node, &mut config.registry)?,
            "job" => {
                let job = parse_job(node)?;
                if !job_names.insert(job.name.clone()) {
                    return Err(ConfigError::Duplicate(format!("job '{}'", job.name)));
                }
                if let Some(key) = job.key() {
                    if !job_keys.insert(key.clone()) {
                        return Err(ConfigError::Duplicate(format!("pull request {}", key)));
                    }
                }
                config.jobs.push(job);
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

fn parse_server(node: &KdlNode, server: &mut ServerSettings) -> ConfigResult<()> {
    for child in child_nodes(node) {
        if child.name().value() == "listen" {
            let listen = get_first_string_arg(child).unwrap_or_else(|| DEFAULT_LISTEN.to_string());
            server.listen = listen.parse().map_err(|e| ConfigError::InvalidValue {
                field: "server.listen".to_string(),
                message: format!("{}: {}", listen, e),
            })?;
        }
    }
    Ok(())
}

fn parse_github(node: &KdlNode, github: &mut GitHubSettings) -> ConfigResult<()> {
    for child in child_nodes(node) {
        match child.name().value() {
            "api-url" => {
                let raw = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField("github.api-url".to_string()))?;
                github.api_url = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                    field: "github.api-url".to_string(),
                    message: format!("{}: {}", raw, e),
                })?;
            }
            "token-env" => {
                github.token_env = get_first_string_arg(child)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| ConfigError::MissingField("github.token-env".to_string()))?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_registry(node: &KdlNode, registry: &mut RegistrySettings) -> ConfigResult<()> {
    for child in child_nodes(node) {
        match child.name().value() {
            "on-stop" => {
                let raw = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField("registry.on-stop".to_string()))?;
                registry.on_stop = raw.parse().map_err(|message| ConfigError::InvalidValue {
                    field: "registry.on-stop".to_string(),
                    message,
                })?;
            }
            "history-limit" => {
                let limit = get_first_int_arg(child)
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: "registry.history-limit".to_string(),
                        message: "expected a positive integer".to_string(),
                    })?;
                registry.history_limit = usize::try_from(limit).map_err(|_| {
                    ConfigError::InvalidValue {
                        field: "registry.history-limit".to_string(),
                        message: format!("{} is too large", limit),
                    }
                })?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_job(node: &KdlNode) -> ConfigResult<WatchedJob> {
    let name = get_first_string_arg(node)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ConfigError::MissingField("job name".to_string()))?;

    let mut repository: Option<RepositoryRef> = None;
    let mut pull_request: Option<u64> = None;
    let mut branch: Option<String> = None;
    let mut triggers = Vec::new();

    for child in child_nodes(node) {
        match child.name().value() {
            "repository" => {
                let raw = get_first_string_arg(child).unwrap_or_default();
                repository = Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
                    field: format!("repository for job '{}'", name),
                    message: format!("expected owner/name, got '{}'", raw),
                })?);
            }
            "pull-request" => {
                let number = get_first_int_arg(child)
                    .filter(|n| *n > 0)
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: format!("pull-request for job '{}'", name),
                        message: "expected a positive integer".to_string(),
                    })?;
                pull_request = Some(number);
            }
            "branch" => {
                branch = get_first_string_arg(child);
            }
            "trigger" => {
                let pattern = get_first_string_arg(child).ok_or_else(|| {
                    ConfigError::MissingField(format!("trigger pattern for job '{}'", name))
                })?;
                CommentPattern::compile(&pattern).map_err(|e| ConfigError::InvalidValue {
                    field: format!("trigger for job '{}'", name),
                    message: e.to_string(),
                })?;
                triggers.push(TriggerRule::new(pattern));
            }
            _ => {}
        }
    }

    let repository = repository
        .ok_or_else(|| ConfigError::MissingField(format!("repository for job '{}'", name)))?;

    let source = match (pull_request, branch) {
        (Some(number), None) => JobSource::pull_request(repository.owner, repository.name, number),
        (None, Some(branch)) => JobSource::branch(repository.owner, repository.name, branch),
        (Some(_), Some(_)) => {
            return Err(ConfigError::InvalidValue {
                field: format!("job '{}'", name),
                message: "pull-request and branch are mutually exclusive".to_string(),
            });
        }
        (None, None) => {
            return Err(ConfigError::MissingField(format!(
                "pull-request or branch for job '{}'",
                name
            )));
        }
    };

    Ok(WatchedJob::new(name, source, triggers))
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

// Helper functions for extracting values from KDL nodes

fn child_nodes(node: &KdlNode) -> &[KdlNode] {
    node.children().map(|c| c.nodes()).unwrap_or_default()
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_int_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}
