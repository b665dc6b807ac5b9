//! nerlens server
//!
//! Loads the NER model once, then serves the entity recognition page.
//!
//! Author: hephaex@gmail.com

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nerlens_core::{AppConfig, LoggingConfig};
use nerlens_web::{create_router, state::AppState};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nerlens")]
#[command(about = "Named entity recognition web front-end")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing(logging: &LoggingConfig) {
    let level = &logging.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("nerlens={level},nerlens_web={level},nerlens_extractor={level},tower_http={level}")
            .into()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);
    tracing::debug!("Starting nerlens...");

    // Model load failure is not fatal; analyses degrade to the error page
    let state = AppState::load(config.clone())?;
    if !state.model_available() {
        tracing::warn!(
            model = %config.model.name,
            "Serving without a model, every analysis will fail"
        );
    }

    let app = create_router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("nerlens listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
