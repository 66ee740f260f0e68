//! CLI entry point for coldpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coldpress")]
#[command(version)]
#[command(about = "Serve a front-matter blog locally or freeze it into a static tree", long_about = None)]
struct Cli {
    /// Set the blog directory (defaults to current directory)
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
    /// Start a local server that reloads content before each request
    #[command(alias = "s")]
    Server {
        /// IP address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write the whole site out as a static file tree
    #[command(alias = "f")]
    Freeze {
        /// Output directory, overriding the configured destination
        #[arg(short = 'o', long)]
        destination: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "coldpress=debug,info"
    } else {
        "coldpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine the blog directory
    let base_dir = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { host, port } => {
            let blog = coldpress::Blog::new(&base_dir)?;
            let host = host.unwrap_or_else(|| blog.config.host.clone());
            let port = port.unwrap_or(blog.config.port);

            tracing::info!("Starting server at http://{}:{}", host, port);
            coldpress::server::start(&blog, &host, port).await?;
        }

        Commands::Freeze { destination } => {
            let mut blog = coldpress::Blog::new(&base_dir)?;
            if let Some(destination) = destination {
                blog.freeze_dir = if destination.is_absolute() {
                    destination
                } else {
                    blog.base_dir.join(destination)
                };
            }

            tracing::info!("Freezing into {:?}", blog.freeze_dir);
            let summary = coldpress::freeze::freeze(&blog)?;
            println!("Frozen: {} files.", summary.files);
            println!("Time: {:.2} seconds.", summary.elapsed.as_secs_f64());
        }
    }

    Ok(())
}
