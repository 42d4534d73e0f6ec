//! draw-signal-bot — Binary Entrypoint
//! Wires the feed client, the signal pipeline, and the notification sinks,
//! then consumes the feed until interrupted.

use anyhow::Result;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use draw_signal_bot::config::Config;
use draw_signal_bot::feed::{backfill_history, FeedClient};
use draw_signal_bot::heartbeat::spawn_heartbeat;
use draw_signal_bot::notify::telegram::TelegramNotifier;
use draw_signal_bot::notify::webhook::WebhookNotifier;
use draw_signal_bot::{FeedLabels, NotifierMux, Pipeline};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_sinks(config: &Config, labels: &FeedLabels) -> NotifierMux {
    let mut mux = NotifierMux::new();

    if config.send_to_web {
        match (&config.web_push_url, &config.web_api_key) {
            (Some(url), Some(key)) => {
                mux.push(Box::new(WebhookNotifier::new(
                    url.clone(),
                    key.clone(),
                    labels.clone(),
                )));
            }
            _ => warn!("web_push_url or web_api_key not set; web push disabled"),
        }
    }

    if config.send_to_telegram {
        mux.push(Box::new(TelegramNotifier::new(
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            labels.clone(),
        )));
    }

    if mux.is_empty() {
        warn!("no sinks configured; reports will only be logged");
    }
    mux
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::load_default()?;
    info!(
        symbol = %config.symbol,
        game = %config.game,
        threshold = config.big_threshold,
        dedup_window = config.dedup_window,
        "starting draw-signal-bot"
    );

    let labels = FeedLabels {
        symbol: config.symbol.clone(),
        timeframe: config.timeframe.clone(),
        game: config.game.clone(),
    };
    let sinks = build_sinks(&config, &labels);
    let mut pipeline = Pipeline::new(config.big_threshold, config.dedup_window);

    if let Some(url) = &config.update_status_url {
        spawn_heartbeat(url.clone(), config.heartbeat_secs);
    }

    let (tx, mut rx) = mpsc::channel::<Value>(256);

    // Seed the pipeline with the latest known round before going live.
    if let Some(url) = &config.history_url {
        let client = reqwest::Client::new();
        if let Err(e) = backfill_history(&client, url, &tx).await {
            warn!(error = ?e, "history backfill failed");
        }
    }

    match &config.stream_url {
        Some(url) => {
            let feed = FeedClient::new(
                url.clone(),
                Duration::from_secs(config.reconnect_delay_secs.max(1)),
            );
            tokio::spawn(feed.run(tx.clone()));
        }
        None => warn!("stream_url not set; only backfill messages will be processed"),
    }
    drop(tx);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupt received; shutting down");
                break;
            }
            msg = rx.recv() => {
                let Some(raw) = msg else {
                    info!("feed channel closed; shutting down");
                    break;
                };
                if let Some(report) = pipeline.handle(&raw) {
                    sinks.dispatch(&report).await;
                }
            }
        }
    }

    Ok(())
}
