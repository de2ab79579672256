//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::{self, serve::ServeOptions};
use folio::content::IndexOutcome;
use folio::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Portfolio content indexer and server", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index project documents into the aggregated JSON artifact
    #[command(alias = "i")]
    Index,

    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,

        /// Serve the existing artifact without re-indexing
        #[arg(long)]
        no_index: bool,
    },

    /// Remove the aggregated JSON artifact
    Clean,

    /// List indexed projects
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let folio = Folio::new(&base_dir)?;

    match cli.command {
        Commands::Index => match folio.index()? {
            IndexOutcome::Written { path, count } => {
                println!("Indexed {} projects into {}", count, path.display());
            }
            IndexOutcome::NoSource => {
                println!(
                    "No content directory at {}, nothing to index",
                    folio.content_dir.display()
                );
            }
        },

        Commands::Serve { port, ip, no_index } => {
            let mut options = ServeOptions::from_config(&folio);
            if let Some(port) = port {
                options.port = port;
            }
            if let Some(ip) = ip {
                options.ip = ip;
            }
            options.skip_index = no_index;
            commands::serve::run(folio, options).await?;
        }

        Commands::Clean => {
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            commands::list::run(&folio)?;
        }
    }

    Ok(())
}
