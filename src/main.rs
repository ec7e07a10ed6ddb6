mod commands;
mod duckduckgo;
mod gemini;
mod markdown;
mod platform;
mod query;
mod search;

pub const USER_AGENT: &str = concat!("profile-scout/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use commands::{Command, Scout};
use tracing::{info, warn};

/// Find and rank LinkedIn profiles from a loose name/company query.
#[derive(Debug, Parser)]
#[command(name = "profile-scout", version, about)]
struct Cli {
    /// Skip Gemini even when GEMINI_API_KEY is set
    #[arg(long, global = true)]
    no_semantic: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("profile_scout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let scout = Scout::new(!cli.no_semantic)?;

    // Dropping the command future abandons any in-flight request.
    let output = tokio::select! {
        output = scout.run(cli.command) => output
            .inspect_err(|e| tracing::error!("command failed: {e}"))?,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            return Err("interrupted".into());
        }
    };

    println!("{output}");
    info!("done");
    Ok(())
}
