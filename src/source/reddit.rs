//! Subreddit feed source.
//!
//! Fetches `<REDDITURL>/new.rss`. Reddit answers that endpoint with an Atom
//! document, while mirrors and proxies tend to serve RSS 2.0, so both are
//! accepted: the body is read as an RSS channel first and as Atom when that
//! fails. Document order is preserved in both cases.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::debug;

use super::{FeedSource, Post};
use crate::error::{RelayError, Result};
use crate::watermark::to_millis;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Reddit rate-limits generic client user agents aggressively.
const USER_AGENT: &str = concat!("subreddit-relay/", env!("CARGO_PKG_VERSION"));

/// The "new posts" feed of one subreddit.
pub struct RedditFeed {
    /// Subreddit base URL, e.g. `https://www.reddit.com/r/rust`. `None` when
    /// `REDDITURL` is unset; every fetch then fails with a config error.
    base_url: Option<String>,
    client: Client,
}

impl RedditFeed {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { base_url, client })
    }

    /// The URL a fetch will hit, if one is configured.
    pub fn feed_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/new.rss", base.trim_end_matches('/')))
    }

    /// Parse a feed document into posts. Pure, no I/O.
    pub fn parse_document(body: &[u8]) -> Result<Vec<Post>> {
        match rss::Channel::read_from(body) {
            Ok(channel) => Ok(Self::parse_channel(&channel)),
            Err(rss_err) => {
                debug!("Not an RSS 2.0 channel ({rss_err}), trying Atom");
                let feed = feed_rs::parser::parse(body)
                    .map_err(|e| RelayError::Feed(format!("failed to parse feed: {e}")))?;
                Ok(Self::parse_atom(feed))
            }
        }
    }

    fn parse_channel(channel: &rss::Channel) -> Vec<Post> {
        channel
            .items()
            .iter()
            .map(|item| {
                let id = item
                    .guid()
                    .map(|g| g.value().to_string())
                    .or_else(|| item.link().map(String::from))
                    .unwrap_or_default();

                let author = item.author().map(String::from).or_else(|| {
                    item.dublin_core_ext()
                        .and_then(|dc| dc.creators().first().cloned())
                });

                Post {
                    id,
                    title: item.title().map(String::from),
                    link: item.link().map(String::from),
                    author,
                    published: item.pub_date().and_then(parse_date),
                    body: item.description().or(item.content()).map(String::from),
                }
            })
            .collect()
    }

    fn parse_atom(feed: feed_rs::model::Feed) -> Vec<Post> {
        feed.entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .iter()
                    .find(|l| l.rel.as_deref() == Some("alternate"))
                    .or_else(|| entry.links.first())
                    .map(|l| l.href.clone());

                let body = entry
                    .content
                    .and_then(|c| c.body)
                    .or_else(|| entry.summary.map(|s| s.content));

                Post {
                    id: entry.id,
                    title: entry.title.map(|t| t.content),
                    link,
                    author: entry.authors.into_iter().next().map(|a| a.name),
                    published: entry.published.or(entry.updated).map(to_millis),
                    body,
                }
            })
            .collect()
    }
}

/// RSS dates are RFC 2822, but RFC 3339 shows up often enough to accept it.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()))
        .ok()
        .map(|dt| to_millis(dt.with_timezone(&Utc)))
}

#[async_trait]
impl FeedSource for RedditFeed {
    fn name(&self) -> &str {
        self.base_url.as_deref().unwrap_or("reddit")
    }

    async fn fetch(&self) -> Result<Vec<Post>> {
        let url = self
            .feed_url()
            .ok_or_else(|| RelayError::Config("No subreddit url set (REDDITURL)".to_string()))?;

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Feed(format!("HTTP error fetching {url}: {status}")));
        }

        let body = response.bytes().await?;
        Self::parse_document(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
