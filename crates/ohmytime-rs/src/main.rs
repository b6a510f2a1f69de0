//! Telegram bot that answers with the local time of a searched location.

mod banner;

use anyhow::{Context, bail};
use clap::Parser;
use log::{error, info, warn};
use ohmytime_config::{OhmytimeConfig, env_keys};
use ohmytime_core::Dispatcher;
use ohmytime_index::{GazetteerIndex, IndexError};
use ohmytime_telegram::{TelegramClient, UpdatePoller};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Command-line options; they take precedence over file and environment settings.
#[derive(Parser, Debug, Default)]
#[command(name = "ohmytime", version)]
struct Cli {
    /// Optional path to an ohmytime.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path to the gazetteer file
    #[arg(long)]
    index: Option<PathBuf>,
    /// Number of dispatcher workers
    #[arg(long)]
    workers: Option<usize>,
}

impl Cli {
    fn apply(&self, config: &mut OhmytimeConfig) {
        if let Some(index) = self.index.as_ref() {
            config.index.path = index.to_string_lossy().into_owned();
        }
        if let Some(workers) = self.workers {
            config.telegram.max_workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let build = banner::build_info();
    print!("{}", banner::render(&build));

    let cli = Cli::parse();
    let mut config = OhmytimeConfig::load(cli.config.as_deref()).context("failed to load config")?;
    config
        .apply_process_env()
        .context("failed to apply environment overrides")?;
    cli.apply(&mut config);
    config.ensure_runnable().context("invalid config")?;

    let _ = env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
    info!(
        "starting bot (build_tag={}, build_time={}, workers={})",
        build.tag, build.time, config.telegram.max_workers
    );

    let index = match GazetteerIndex::open(&config.index.path, config.index.search_limit) {
        Ok(index) => index,
        Err(IndexError::NotFound(path)) => bail!(
            "index file not found at {}, set {} to the gazetteer file",
            path.display(),
            env_keys::PATH_TO_INDEX
        ),
        Err(err) => return Err(err).context("failed to load index"),
    };
    info!(
        "index loaded (path={}, records={})",
        config.index.path,
        index.len()
    );

    let client = Arc::new(
        TelegramClient::new(
            &config.telegram.api_url,
            &config.telegram.token,
            Duration::from_secs(config.telegram.polling_timeout),
        )
        .context("failed to build telegram client")?,
    );
    client
        .delete_webhook()
        .await
        .context("failed to remove webhook")?;

    let cancel = CancellationToken::new();
    let (updates_tx, updates_rx) = mpsc::channel(config.telegram.max_workers);
    let poller = tokio::spawn(
        UpdatePoller::new(client.clone(), config.telegram.polling_timeout)
            .run(updates_tx, cancel.clone()),
    );
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(err) => error!("failed to listen for ctrl-c: {}", err),
            }
            cancel.cancel();
        }
    });

    let dispatcher = Dispatcher::new(Arc::new(index), client, &build);
    dispatcher
        .run(updates_rx, config.telegram.max_workers, cancel.clone())
        .await
        .context("dispatcher failed")?;

    cancel.cancel();
    if let Err(err) = poller.await {
        warn!("update poller terminated abnormally: {}", err);
    }
    info!("bot stopped");
    Ok(())
}
