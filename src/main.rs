//! subreddit-relay: forwards new subreddit posts to a Discord channel.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌─────────────┐  tick  ┌──────────┐  fetch()  ┌──────────────────┐
//! │ scheduler   │ ─────► │ cycle    │ ────────► │ source/ (Reddit) │
//! │ (interval)  │        │          │           └──────────────────┘
//! └─────────────┘        │          │  load/save ┌──────────────────┐
//!                        │          │ ─────────► │ watermark file   │
//!                        │          │            └──────────────────┘
//!                        │          │  render()  ┌──────────┐ deliver() ┌──────────────────┐
//!                        │          │ ─────────► │ render   │ ────────► │ notify/ (Discord)│
//!                        └──────────┘            └──────────┘           └──────────────────┘
//! ```
//!
//! * **`source/`** the `FeedSource` trait, the `Post` record and the
//!   subreddit feed implementation.
//! * **`watermark`** the single persisted timestamp.
//! * **`render`** pure conversion from `Post` to card fields.
//! * **`notify/`** the `Notifier` trait and the Discord channel notifier.
//! * **`cycle`** fetch, filter, deliver, persist.
//! * **`scheduler`** runs the cycle now and then on a fixed interval.
//! * **`main`** wires everything together.

mod config;
mod cycle;
mod error;
mod logging;
mod notify;
mod render;
mod scheduler;
mod source;
#[cfg(test)]
mod test_support;
mod watermark;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use config::Config;
use cycle::Cycle;
use notify::{ChannelNotifier, DiscordClient};
use scheduler::Scheduler;
use source::RedditFeed;
use watermark::WatermarkStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init(&config.log_level);
    for warning in &config.warnings {
        warn!("{warning}");
    }

    if config.reddit_url.is_none() {
        error!("No subreddit url set (REDDITURL); cycles will fail until it is configured.");
    }
    if config.channel_id.is_none() {
        error!("No channel id set (CHANNEL); deliveries will fail until it is configured.");
    }

    // -- authenticate --------------------------------------------------------
    let token = config.token.as_deref().context("TOKEN must be set")?;
    let discord = DiscordClient::new(token).context("failed to build Discord client")?;
    let me = discord
        .current_user()
        .await
        .context("failed to authenticate with Discord")?;
    info!("Logged in as {} (id {})!", me.tag(), me.id);

    // -- wire the cycle ------------------------------------------------------
    let source = RedditFeed::new(config.reddit_url.clone()).context("failed to build feed client")?;
    let notifier = ChannelNotifier::new(discord, config.channel_id.clone());
    let cycle = Cycle::new(
        Box::new(source),
        Box::new(notifier),
        WatermarkStore::new(&config.watermark_file),
    );

    // -- run until Ctrl-C ----------------------------------------------------
    let cycle = &cycle;
    Scheduler::new(config.poll_interval)
        .run(
            move || async move {
                if let Err(e) = cycle.run().await {
                    error!("Error running poll cycle: {e}");
                }
            },
            shutdown_signal(),
        )
        .await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
