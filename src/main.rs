//! Spendview main entry point

use anyhow::Context;
use clap::Parser;
use spendview_api::start_server;
use spendview_config::{Config, ConfigError};
use spendview_core::ViewController;
use spendview_data::{CachedProvider, InMemoryProvider, ProviderRef};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "spendview")]
#[command(author = "Spendview Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A filterable, paginated employee transaction viewer", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    match Config::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound { path }) => {
            eprintln!("Config file {} not found, using defaults", path);
            Ok(Config::default())
        }
        Err(e) => {
            eprintln!("{}", e.to_details());
            Err(e).context("Failed to load configuration")
        }
    }
}

async fn build_provider(config: &Config) -> anyhow::Result<ProviderRef> {
    let data_file = config.provider.data_file.clone();
    let memory = InMemoryProvider::from_file(data_file.clone(), config.provider.page_size)
        .await
        .with_context(|| format!("Failed to load fixture {}", data_file.display()))?
        .with_latency(Duration::from_millis(config.provider.latency_ms));

    let provider: ProviderRef = Arc::new(memory);
    if config.cache.enabled {
        log::info!("Response cache enabled");
        return Ok(Arc::new(CachedProvider::new(provider)));
    }
    Ok(provider)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args.config)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();
    log::info!(
        "Config loaded: data file={}, page size={}, cache={}",
        config.provider.data_file.display(),
        config.provider.page_size,
        config.cache.enabled
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let provider = build_provider(&config).await?;
        let controller = Arc::new(ViewController::new(provider));

        let startup = controller.clone();
        tokio::spawn(async move {
            let snapshot = startup.start().await;
            log::info!("transaction view ready: {} transactions", snapshot.transactions.len());
        });

        start_server(config, controller).await.context("Server error")
    })
}
