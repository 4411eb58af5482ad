//! Delivery of rendered posts to a chat destination.

mod discord;

pub use discord::{ChannelNotifier, DiscordClient};

use async_trait::async_trait;

use crate::error::Result;
use crate::render::RenderedMessage;

/// Sends one rendered post. An `Err` means the post was not delivered.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, message: &RenderedMessage) -> Result<()>;
}
