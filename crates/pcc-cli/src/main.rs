use anyhow::Result;
use clap::{Parser, Subcommand};
use pcc_resource::RESOURCE_ID;
use std::path::PathBuf;

mod commands;
mod show;
mod state;

#[derive(Parser)]
#[command(name = "pcc-policy")]
#[command(about = "Manage the Compute container compliance policy from a declarative config")]
#[command(version)]
struct Cli {
    /// Provider config with console URL and credentials (PCC_* env vars override it)
    #[arg(long, global = true, default_value = "provider.yaml")]
    provider: PathBuf,

    /// State file holding the last refreshed policy
    #[arg(long, global = true, default_value = "pcc-policy.state.json")]
    state: PathBuf,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the configured rules to the console (create or update)
    Apply {
        /// Policy config file
        #[arg(long, default_value = "policy.yaml")]
        config: PathBuf,
    },

    /// Re-read the console policy into the state file
    Refresh,

    /// Start managing the existing console policy
    Import {
        /// Resource id (default: containerCompliance)
        #[arg(default_value = RESOURCE_ID)]
        id: String,
    },

    /// Stop managing the policy (console rules are left in place)
    Destroy,

    /// Print the current state
    Show {
        /// Output format: json, text (default: text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a policy config without contacting the console
    Validate {
        /// Policy config file
        #[arg(long, default_value = "policy.yaml")]
        config: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Apply { config } => {
            commands::apply(&cli.provider, &cli.state, &config).await?;
        }
        Commands::Refresh => {
            commands::refresh(&cli.provider, &cli.state).await?;
        }
        Commands::Import { id } => {
            commands::import(&cli.provider, &cli.state, &id).await?;
        }
        Commands::Destroy => {
            commands::destroy(&cli.provider, &cli.state).await?;
        }
        Commands::Show { format } => {
            show::show(&cli.state, &format)?;
        }
        Commands::Validate { config } => {
            commands::validate(&config)?;
        }
    }

    Ok(())
}
