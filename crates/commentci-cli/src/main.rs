//! Comment CI command line tool.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "commentci")]
#[command(about = "Comment-triggered build CLI", long_about = None)]
struct Cli {
    /// Webhook server URL
    #[arg(long, env = "COMMENTCI_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "commentci.kdl")]
        path: String,
    },
    /// Check whether a comment fully matches a trigger pattern
    Match {
        /// Trigger pattern (regular expression)
        pattern: String,
        /// Comment body
        comment: String,
    },
    /// Send a saved webhook payload to the server
    Replay {
        /// Path to the JSON payload
        payload: String,
        /// Value for the X-GitHub-Event header
        #[arg(long, default_value = "issue_comment")]
        event: String,
    },
    /// List watched jobs
    Jobs,
    /// List recently scheduled builds
    Builds,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
        Commands::Match { pattern, comment } => {
            commands::check_match(&pattern, &comment)?;
        }
        Commands::Replay { payload, event } => {
            commands::webhooks::replay(&cli.api_url, &payload, &event).await?;
        }
        Commands::Jobs => {
            commands::server::jobs(&cli.api_url).await?;
        }
        Commands::Builds => {
            commands::server::builds(&cli.api_url).await?;
        }
    }

    Ok(())
}
