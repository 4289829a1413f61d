use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::fmt;
use std::time::Duration;

use crate::activity::get_activities;
use crate::channel::{resolve_channel, ChannelInfoCache};
use crate::dedup::{DedupKey, DedupTracker};
use crate::language::LanguageDetector;
use crate::notifier::{format_message, ChatSink};
use crate::youtube::VideoPlatform;

/// Paces the poll loop between cycles.
#[async_trait]
pub trait Ticker: Send {
    /// Waits until the next cycle is due; `false` stops the loop.
    async fn tick(&mut self) -> bool;
}

/// Sleeps a fixed interval between cycles, forever.
pub struct IntervalTicker {
    interval: Duration,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        IntervalTicker { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        tokio::time::sleep(self.interval).await;
        true
    }
}

/// State that lives as long as the poll loop.
#[derive(Debug)]
pub struct PollContext {
    pub channels: ChannelInfoCache,
    pub notified: DedupTracker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The handle search found no channel.
    Unresolved,
    /// The handle search itself failed.
    ResolveFailed(String),
    /// The channel metadata lookup failed.
    InfoFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unresolved => write!(f, "no matching channel"),
            SkipReason::ResolveFailed(err) => write!(f, "channel search failed: {}", err),
            SkipReason::InfoFailed(err) => write!(f, "channel lookup failed: {}", err),
        }
    }
}

/// Result of polling one configured channel in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Processed { notified: usize, failed: usize },
    Skipped(SkipReason),
}

pub struct Poller<P, N, D> {
    platform: P,
    sink: N,
    detector: D,
    channels: Vec<String>,
    context: PollContext,
}

impl<P, N, D> Poller<P, N, D>
where
    P: VideoPlatform,
    N: ChatSink,
    D: LanguageDetector,
{
    pub fn new(platform: P, sink: N, detector: D, channels: Vec<String>) -> Self {
        Poller {
            platform,
            sink,
            detector,
            channels,
            context: PollContext {
                channels: ChannelInfoCache::new(),
                notified: DedupTracker::new(),
            },
        }
    }

    /// Runs cycles until the ticker says stop.
    pub async fn run<T: Ticker>(mut self, mut ticker: T) {
        info!("Monitoring {} channels", self.channels.len());
        loop {
            self.run_cycle().await;
            if !ticker.tick().await {
                break;
            }
        }
    }

    /// Polls every configured channel once, in order.
    pub async fn run_cycle(&mut self) -> Vec<(String, ChannelOutcome)> {
        let mut outcomes = Vec::with_capacity(self.channels.len());
        for reference in self.channels.clone() {
            let outcome = self.poll_channel(&reference).await;
            match &outcome {
                ChannelOutcome::Processed { notified, failed } => debug!(
                    "{}: {} notified, {} failed",
                    reference, notified, failed
                ),
                ChannelOutcome::Skipped(reason) => warn!("Skipping {}: {}", reference, reason),
            }
            outcomes.push((reference, outcome));
        }
        info!(
            "Cycle finished: {} channels known, {} items notified so far",
            self.context.channels.len(),
            self.context.notified.len()
        );
        outcomes
    }

    async fn poll_channel(&mut self, reference: &str) -> ChannelOutcome {
        let channel_id = match resolve_channel(&self.platform, reference).await {
            Ok(Some(id)) => id,
            Ok(None) => return ChannelOutcome::Skipped(SkipReason::Unresolved),
            Err(err) => {
                error!("Error processing {}: {:#}", reference, err);
                return ChannelOutcome::Skipped(SkipReason::ResolveFailed(err.to_string()));
            }
        };

        let info = match self
            .context
            .channels
            .get_channel_info(&self.platform, &self.detector, &channel_id)
            .await
        {
            Ok(info) => info,
            Err(err) => {
                error!("Error processing {}: {:#}", reference, err);
                return ChannelOutcome::Skipped(SkipReason::InfoFailed(err.to_string()));
            }
        };

        let mut notified = 0;
        let mut failed = 0;
        for activity in get_activities(&self.platform, &channel_id).await {
            let Some(media_id) = activity.media_id.as_deref() else {
                debug!("{}: {:?} has no media id", channel_id, activity.title);
                continue;
            };
            let key = DedupKey::new(&channel_id, media_id);
            if self.context.notified.contains(&key) {
                continue;
            }

            let delivered = match format_message(&activity, &info) {
                Ok(message) => self.sink.send_notification(&message).await,
                Err(err) => Err(err),
            };
            match delivered {
                Ok(()) => {
                    self.context.notified.record(key, &activity.published_at);
                    notified += 1;
                }
                Err(err) => {
                    error!(
                        "Failed to notify {} for {}: {:#}",
                        media_id, reference, err
                    );
                    failed += 1;
                }
            }
        }

        ChannelOutcome::Processed { notified, failed }
    }
}
