// src/main.rs — promptlab entry point

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use promptlab::cli::playground::{self, PlaygroundOptions};
use promptlab::cli::Cli;
use promptlab::core::controller::PromptSession;
use promptlab::infra::config::Config;
use promptlab::infra::logger;
use promptlab::provider::google::GoogleProvider;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let provider = GoogleProvider::new(
        config.provider.base_url.clone(),
        config.provider.request_timeout_secs.map(Duration::from_secs),
    )?;

    let generation = cli.apply_generation_overrides(config.generation.to_generation_config());
    let preferred_model = cli.model.clone().or_else(|| config.ui.preferred_model.clone());

    let mut controller = PromptSession::new(Arc::new(provider), generation)
        .with_fallback_model(config.provider.default_model.clone())
        .with_preferred_model(preferred_model);

    let opts = PlaygroundOptions {
        spinner: config.ui.spinner && !cli.quiet,
    };

    playground::run_playground(&mut controller, opts).await
}
