//! CLI command implementations.

pub mod server;
pub mod webhooks;

use anyhow::Result;
use commentci_core::RepositoryKey;

pub fn validate(path: &str) -> Result<()> {
    match commentci_config::load_config(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  listen: {}", config.server.listen);
            println!("  on stop: {:?}", config.registry.on_stop);
            for job in &config.jobs {
                let key = RepositoryKey::for_source(&job.source)
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "(branch, not watched)".to_string());
                println!(
                    "  job {} -> {} ({} triggers)",
                    job.name,
                    key,
                    job.triggers.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn check_match(pattern: &str, comment: &str) -> Result<()> {
    if commentci_dispatch::matches(pattern, comment)? {
        println!("Comment matches");
        Ok(())
    } else {
        println!("Comment does not match");
        std::process::exit(1);
    }
}
