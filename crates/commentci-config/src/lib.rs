//! KDL configuration parsing for comment-triggered builds.
//!
//! This crate handles parsing of:
//! - Server, GitHub API and registry settings
//! - Watched job definitions and their comment triggers

pub mod error;
pub mod system;

pub use error::{ConfigError, ConfigResult};
pub use system::{
    CommentCiConfig, GitHubSettings, RegistrySettings, ServerSettings, load_config, parse_config,
};
