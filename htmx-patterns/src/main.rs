use std::path::PathBuf;

use clap::Parser;
use htmx_patterns::prelude::*;
use htmx_patterns::store::make_monsters;

/// htmx-patterns - server-rendered htmx demo pages
#[derive(Parser)]
#[command(name = "htmx-patterns")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of searching the default locations
    #[arg(short, long, env = "HTMX_PATTERNS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the number of monsters created at startup
    #[arg(long)]
    seed: Option<usize>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("\nCaused by: {source}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(port) = cli.port {
        config.service.port = port;
    }
    if let Some(seed) = cli.seed {
        config.seed.monsters = seed;
    }

    init_tracing(&config)?;

    let state = AppState::builder().config(config.clone()).build()?;

    let today = chrono::Local::now().date_naive();
    let seeded = make_monsters(state.store(), config.seed.monsters, today).await?;
    tracing::info!(count = seeded.len(), "Seeded monsters");

    let app = views::router(state)?;
    Server::new(config).serve(app).await?;

    shutdown_tracing();
    Ok(())
}
