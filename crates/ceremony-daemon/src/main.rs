//! ceremony-daemon: runs a guardian key ceremony in-process.
//!
//! Every guardian runs as its own Tokio task and talks only to a shared
//! mediator. The resulting joint key is printed as JSON and optionally
//! written to the configured report file.

mod ceremony;
mod config;
mod participant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CeremonyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = CeremonyConfig::load()?;

    // 2. Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        ceremony_id = %config.ceremony.ceremony_id,
        guardians = config.ceremony.number_of_guardians,
        quorum = config.ceremony.quorum,
        "ceremony daemon starting"
    );

    // 3. Run the ceremony
    let report = ceremony::run(&config).await?;

    // 4. Report
    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = config.output_path() {
        std::fs::write(&path, &json)?;
        info!(path = %path.display(), "report written");
    }
    println!("{json}");

    Ok(())
}
