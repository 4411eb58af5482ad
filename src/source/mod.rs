//! Feed source abstraction.
//!
//! This module defines the [`FeedSource`] trait and the common [`Post`]
//! type. Concrete sources live in sub-modules; currently only
//! [`RedditFeed`], which reads a subreddit's "new posts" feed.
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lemmy.rs`).
//! 2. Define a struct holding its settings and implement [`FeedSource`].
//! 3. Add `mod lemmy;` below and re-export the struct in the `pub use` block.
//! 4. Construct it in `main.rs` and hand it to `Cycle::new`.
//!
//! The cycle, renderer and notifier are source-agnostic; they only see
//! [`Post`] values.

mod post;
mod reddit;

pub use post::Post;
pub use reddit::RedditFeed;

use async_trait::async_trait;

use crate::error::Result;

/// Trait that every feed source must implement.
///
/// The cycle calls [`fetch()`](FeedSource::fetch) once per tick and awaits
/// it before touching the watermark, so implementations must be [`Send`]
/// and [`Sync`] to live behind a `Box<dyn FeedSource>`.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { url: String }
///
/// #[async_trait]
/// impl FeedSource for MySource {
///     fn name(&self) -> &str { &self.url }
///
///     async fn fetch(&self) -> Result<Vec<Post>> {
///         // Perform the HTTP request, then convert into Post values.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Fetch the current page of posts, in the feed's own order.
    ///
    /// The order is not guaranteed to be chronological and callers must not
    /// rely on it being so. Network and parse failures are returned as
    /// errors; the cycle logs them and sends nothing that tick.
    async fn fetch(&self) -> Result<Vec<Post>>;
}
