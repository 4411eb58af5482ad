//! The post record every feed format is normalised into.
//!
//! `Post` is what the rest of the relay sees of a feed entry. Each source
//! converts its native items (RSS `<item>`, Atom `<entry>`) into `Post`
//! values, so the cycle and the renderer never need to know which format
//! the feed was in.
//!
//! ## For contributors
//!
//! If you are adding a new feed source you should not need to touch this
//! file. Build `Post` values in your source's `fetch()` and leave fields
//! `None` when the feed does not carry them; do not invent placeholders
//! here. The renderer owns fallback text, and the cycle owns what a missing
//! date or body means.
//!
//! Timestamps must be passed through [`to_millis`] before they land in
//! `published`, because that is the precision the watermark file keeps.

use chrono::{DateTime, Utc};

use crate::watermark::to_millis;

/// A single feed entry, normalised from any source.
///
/// Posts are transient: they live for one cycle and are never persisted
/// individually. Only the newest delivered `published` value survives, as
/// the watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Identifier used in log lines.
    ///
    /// For RSS this is `<guid>` (falling back to `<link>`); for Atom it is
    /// `<id>`, which Reddit fills with the `t3_…` thing id.
    pub id: String,

    /// Headline as given by the feed, unescaped.
    pub title: Option<String>,

    /// Permalink to the post on the site.
    pub link: Option<String>,

    /// Author exactly as the feed gives it.
    ///
    /// Reddit uses a path such as `/u/someone`, which the renderer turns into
    /// a profile URL by prefixing the site host.
    pub author: Option<String>,

    /// Publication time, truncated to milliseconds.
    ///
    /// `None` means the feed gave no date or one that could not be parsed.
    /// Such posts cannot be compared against the watermark and are never
    /// delivered.
    pub published: Option<DateTime<Utc>>,

    /// Raw HTML body (`<description>` / `<content>`).
    ///
    /// `None` (or blank) means there is nothing to render and the post is
    /// skipped.
    pub body: Option<String>,
}

impl Post {
    /// Whether this post is strictly newer than `watermark`.
    ///
    /// Undated posts are never newer; equal timestamps count as seen.
    pub fn is_newer_than(&self, watermark: DateTime<Utc>) -> bool {
        self.published
            .is_some_and(|published| to_millis(published) > watermark)
    }
}
