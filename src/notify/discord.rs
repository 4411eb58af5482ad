//! Discord REST client and the channel notifier built on it.
//!
//! Only three endpoints are needed, so this talks to the HTTP API directly
//! instead of holding a gateway connection:
//!
//! * `GET /users/@me` to authenticate at startup,
//! * `GET /channels/{id}` to resolve the destination and check it takes text,
//! * `POST /channels/{id}/messages` to send the embed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Notifier;
use crate::error::{RelayError, Result};
use crate::render::RenderedMessage;

const API_BASE: &str = "https://discord.com/api/v10";

/// Reddit orange.
pub const ACCENT_COLOR: u32 = 0xFF4500;

const TITLE_LIMIT: usize = 256;
const AUTHOR_NAME_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;

/// Authenticated handle on the Discord HTTP API.
#[derive(Clone)]
pub struct DiscordClient {
    client: reqwest::Client,
    base_url: String,
}

impl DiscordClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(API_BASE, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| RelayError::Config("TOKEN contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(
                "DiscordBot (https://github.com/subreddit-relay, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The bot account the token belongs to. Fails if the token is rejected.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn channel(&self, channel_id: &str) -> Result<Channel> {
        let response = self
            .client
            .get(format!("{}/channels/{}", self.base_url, channel_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RelayError::ChannelNotFound(channel_id.to_string()));
        }
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_message(&self, channel_id: &str, payload: &MessagePayload) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/channels/{}/messages", self.base_url, channel_id))
            .json(payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RelayError::Discord { status, body })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl CurrentUser {
    /// `name#1234` for legacy accounts, plain `name` otherwise.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Channel {
    /// Channel types that accept messages: guild text, DM, guild voice,
    /// group DM, announcement, the three thread kinds and stage.
    pub fn is_text_based(&self) -> bool {
        matches!(self.kind, 0 | 1 | 2 | 3 | 5 | 10 | 11 | 12 | 13)
    }
}

// ---------------------------------------------------------------------------
// Message payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MessagePayload {
    embeds: Vec<Embed>,
    allowed_mentions: AllowedMentions,
}

/// An empty `parse` list means nothing in the message pings anyone.
#[derive(Debug, Default, Serialize)]
struct AllowedMentions {
    parse: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    color: u32,
    author: EmbedAuthor,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EmbedImage>,
}

#[derive(Debug, Serialize)]
struct EmbedAuthor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbedImage {
    url: String,
}

impl MessagePayload {
    /// A single-embed message for `message`, stamped with `sent_at`.
    pub fn embed(message: &RenderedMessage, sent_at: DateTime<Utc>) -> Self {
        let embed = Embed {
            title: truncate(&message.title, TITLE_LIMIT),
            url: web_url(&message.link),
            color: ACCENT_COLOR,
            author: EmbedAuthor {
                name: truncate(&message.author, AUTHOR_NAME_LIMIT),
                url: web_url(&message.author_link),
            },
            timestamp: sent_at,
            description: message
                .excerpt
                .as_deref()
                .map(|text| truncate(text, DESCRIPTION_LIMIT)),
            image: message
                .image
                .as_deref()
                .and_then(web_url)
                .map(|url| EmbedImage { url }),
        };

        Self {
            embeds: vec![embed],
            allowed_mentions: AllowedMentions::default(),
        }
    }
}

/// Discord rejects the whole message if a URL field is not absolute http(s).
fn web_url(candidate: &str) -> Option<String> {
    let is_web = candidate.starts_with("https://") || candidate.starts_with("http://");
    (is_web && !candidate.contains(char::is_whitespace)).then(|| candidate.to_string())
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit - 1).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Posts rendered messages to one Discord channel.
pub struct ChannelNotifier {
    client: DiscordClient,
    /// `None` when `CHANNEL` is unset; every delivery then fails.
    channel_id: Option<String>,
}

impl ChannelNotifier {
    pub fn new(client: DiscordClient, channel_id: Option<String>) -> Self {
        Self { client, channel_id }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, message: &RenderedMessage) -> Result<()> {
        let channel_id = self
            .channel_id
            .as_deref()
            .ok_or_else(|| RelayError::Config("No channel id set (CHANNEL)".to_string()))?;

        let channel = self.client.channel(channel_id).await?;
        if !channel.is_text_based() {
            return Err(RelayError::NotTextChannel(channel.id));
        }

        debug!("Sending {:?} to channel {}", message.title, channel_id);
        let payload = MessagePayload::embed(message, Utc::now());
        self.client.create_message(channel_id, &payload).await
    }
}
