//! `pantry`: suggest recipes for the ingredients at hand.

use anyhow::Context;
use clap::Parser;
use log::info;
use pantry_rs::config::LayeredConfigOptions;
use pantry_rs::inference::{ChatCompletionClient, InferenceClient};
use pantry_rs::storage::{FileKeyValueStore, KeyValueStore};
use pantry_rs::tui::TuiConfig;
use pantry_rs::{ConfigOverrides, resolve_config};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the Pantry TUI.
#[derive(Parser)]
#[command(name = "pantry", version)]
struct Cli {
    /// Optional path to a pantry.json5 config file applied last
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chat-completion model id
    #[arg(long)]
    model: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long)]
    base_url: Option<String>,
    /// Path of the JSON file holding saved ingredients and ratings
    #[arg(long)]
    storage: Option<PathBuf>,
    /// Restore the saved ingredient list on startup
    #[arg(long)]
    load: bool,
}

/// Entry point for the Pantry TUI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pantry_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting pantry (config_set={}, model_set={}, base_url_set={}, storage_set={})",
        cli.config.is_some(),
        cli.model.is_some(),
        cli.base_url.is_some(),
        cli.storage.is_some()
    );

    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let overrides = ConfigOverrides {
        config_path: cli.config,
        model: cli.model,
        base_url: cli.base_url,
        storage_path: cli.storage,
    };
    let config = resolve_config(LayeredConfigOptions::new(&cwd), &overrides)
        .context("failed to load config")?;

    let storage_path = config
        .storage
        .resolved_path()
        .context("cannot determine storage path; pass --storage")?;
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        FileKeyValueStore::open(&storage_path)
            .with_context(|| format!("failed to open storage at {}", storage_path.display()))?,
    );

    let client: Arc<dyn InferenceClient> = Arc::new(
        ChatCompletionClient::from_config(&config.inference)
            .context("failed to build inference client")?,
    );

    let tui_config = TuiConfig {
        model_name: config.inference.model.clone(),
        min_ingredients: config.generation.min_ingredients,
        load_on_start: cli.load,
    };
    pantry_rs::tui::run(client, storage, tui_config).await
}
