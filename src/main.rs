mod activity;
mod api;
mod channel;
mod config;
mod dedup;
mod language;
mod notifier;
mod poll;
mod utilities;
mod youtube;

use anyhow::Result;
use log::info;

use crate::config::{Config, CHANNELS_TO_MONITOR, CHECK_INTERVAL};
use crate::language::WhatlangDetector;
use crate::notifier::TelegramNotifier;
use crate::poll::{IntervalTicker, Poller};
use crate::youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    info!(
        "Checking {} channels every {}s",
        CHANNELS_TO_MONITOR.len(),
        CHECK_INTERVAL.as_secs()
    );

    let poller = Poller::new(
        YouTubeClient::new(&config.youtube_api_key, &config.youtube_api_base),
        TelegramNotifier::new(
            &config.telegram_token,
            &config.telegram_chat_id,
            &config.telegram_api_base,
        ),
        WhatlangDetector,
        CHANNELS_TO_MONITOR.iter().map(|c| c.to_string()).collect(),
    );

    // Spawn the polling task.
    let monitoring = tokio::spawn(poller.run(IntervalTicker::new(CHECK_INTERVAL)));

    let api_server = api::run_api_server(config.port);

    // Run polling and the health server concurrently; either one ending stops the process.
    tokio::select! {
        result = monitoring => result?,
        result = api_server => result?,
    }
    Ok(())
}
