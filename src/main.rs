use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use emote_porter::infrastructure::{
    AppConfig, ImageTranscoder, JsonGuildStore, SevenTvClient, StorageManager,
};
use emote_porter::presentation::{App, Cli};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn create_app(config: &AppConfig) -> Result<App> {
    let source = Arc::new(SevenTvClient::with_base_url(
        &config.api.base_url,
        &config.api.version,
        config.api.timeout(),
    )?);
    let transcoder = Arc::new(ImageTranscoder::new(config.emotes.transcoder()));

    let data_dir = config
        .effective_data_dir()
        .ok_or_else(|| eyre!("could not determine a data directory, pass --data-dir"))?;
    let store = Arc::new(JsonGuildStore::new(data_dir));

    Ok(App::new(source, transcoder, store, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let cli = Cli::parse();

    let storage = StorageManager::new()?;
    let (mut config, source) = storage.load_config(cli.args.config.as_deref())?;
    config.merge_with_args(&cli.args);

    init_logging(&config)?;
    source.log();

    info!(version = emote_porter::VERSION, "Starting {}", emote_porter::NAME);

    let app = create_app(&config)?;
    app.run(cli.command).await
}
