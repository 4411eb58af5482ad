//! One poll cycle: fetch, filter against the watermark, deliver, persist.
//!
//! The newest delivered timestamp is returned by the delivery step and handed
//! straight to the persistence step; nothing survives between cycles except
//! the watermark file.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::notify::Notifier;
use crate::render::render;
use crate::source::{FeedSource, Post};
use crate::watermark::{to_millis, WatermarkStore};

/// What a cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub delivered: usize,
    /// Posts that were new but could not be delivered.
    pub failed: usize,
    /// New posts dropped before delivery because they had no body.
    pub skipped: usize,
    /// Newest publication time among delivered posts; `Some` iff
    /// `delivered > 0`.
    pub watermark: Option<DateTime<Utc>>,
}

pub struct Cycle {
    source: Box<dyn FeedSource>,
    notifier: Box<dyn Notifier>,
    store: WatermarkStore,
}

impl Cycle {
    pub fn new(
        source: Box<dyn FeedSource>,
        notifier: Box<dyn Notifier>,
        store: WatermarkStore,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
        }
    }

    /// Run one cycle.
    ///
    /// Fails, sending nothing, if the feed cannot be fetched or the watermark
    /// cannot be loaded. Individual delivery failures and a failed watermark
    /// write are logged and reflected in the report instead.
    pub async fn run(&self) -> Result<CycleReport> {
        let posts = self.source.fetch().await?;
        debug!("Fetched {} post(s) from {}", posts.len(), self.source.name());

        let watermark = match self.store.load().await {
            Ok(at) => at,
            Err(e) => {
                error!(
                    "Cannot read watermark from {}: {e}. Write an ISO-8601 timestamp \
                     (e.g. 2024-01-01T00:00:00.000Z) to this file to start relaying.",
                    self.store.path().display()
                );
                return Err(e);
            }
        };
        debug!("Current watermark: {watermark}");

        let report = self.deliver_new(&posts, watermark).await;

        if let Some(newest) = report.watermark {
            match self.store.save(newest).await {
                Ok(()) => info!("Watermark advanced to {newest}"),
                Err(e) => error!(
                    "Error writing watermark to {}: {e}",
                    self.store.path().display()
                ),
            }
        }

        info!(
            "Cycle finished: {} delivered, {} failed, {} skipped",
            report.delivered, report.failed, report.skipped
        );
        Ok(report)
    }

    /// Deliver every post newer than `watermark`, in feed order.
    async fn deliver_new(&self, posts: &[Post], watermark: DateTime<Utc>) -> CycleReport {
        let mut report = CycleReport::default();

        for post in posts {
            if !post.is_newer_than(watermark) {
                continue;
            }
            let Some(published) = post.published.map(to_millis) else {
                continue;
            };

            let Some(message) = render(post) else {
                debug!("Skipping {}: no body", post.id);
                report.skipped += 1;
                continue;
            };

            match self.notifier.deliver(&message).await {
                Ok(()) => {
                    info!("Sent {} ({})", post.id, message.title);
                    report.delivered += 1;
                    report.watermark = report.watermark.max(Some(published));
                }
                Err(e) => {
                    warn!("Error sending {}: {e}", post.id);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
