//! Turns a [`Post`] into the fields shown in a chat card.
//!
//! Pure: no I/O, no clock. Delivery-time concerns (timestamp, colour, chat
//! limits) belong to the notifier.

use scraper::{Html, Selector};

use crate::source::Post;

/// Base URL prepended to Reddit's `/u/name` author paths.
pub const AUTHOR_URL_PREFIX: &str = "https://www.reddit.com";

pub const FALLBACK_TITLE: &str = "Untitled post";
pub const FALLBACK_LINK: &str = "Link unavailable";
pub const FALLBACK_AUTHOR: &str = "Unknown author";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub title: String,
    pub link: String,
    pub author: String,
    pub author_link: String,
    /// Trimmed text of the post body (`.md` container), if any.
    pub excerpt: Option<String>,
    /// `src` of the first image in the body.
    pub image: Option<String>,
}

/// Render a post, or `None` when it has no body to show.
///
/// An empty or whitespace-only body counts as no body.
pub fn render(post: &Post) -> Option<RenderedMessage> {
    let body = post.body.as_deref().filter(|b| !b.trim().is_empty())?;
    let document = Html::parse_fragment(body);

    let author = post
        .author
        .clone()
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());

    Some(RenderedMessage {
        title: post
            .title
            .clone()
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        link: post.link.clone().unwrap_or_else(|| FALLBACK_LINK.to_string()),
        author_link: format!("{AUTHOR_URL_PREFIX}{author}"),
        author,
        excerpt: excerpt(&document),
        image: first_image(&document),
    })
}

fn first_image(document: &Html) -> Option<String> {
    let selector = Selector::parse("img").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(String::from)
}

/// Text of every `.md` element, concatenated, then trimmed.
fn excerpt(document: &Html) -> Option<String> {
    let selector = Selector::parse(".md").ok()?;
    let text: String = document
        .select(&selector)
        .flat_map(|el| el.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_body(body: Option<&str>) -> Post {
        Post {
            id: "t3_abc".to_string(),
            title: Some("Hello world".to_string()),
            link: Some("https://www.reddit.com/r/rust/comments/abc/".to_string()),
            author: Some("/u/ferris".to_string()),
            published: None,
            body: body.map(String::from),
        }
    }

    #[test]
    fn plain_md_body_gives_excerpt_and_no_image() {
        let msg = render(&post_with_body(Some(r#"<div class="md">Hello</div>"#))).unwrap();
        assert_eq!(msg.excerpt.as_deref(), Some("Hello"));
        assert!(msg.image.is_none());
        assert_eq!(msg.title, "Hello world");
        assert_eq!(msg.link, "https://www.reddit.com/r/rust/comments/abc/");
    }

    #[test]
    fn author_link_is_prefixed_path() {
        let msg = render(&post_with_body(Some("<p>x</p>"))).unwrap();
        assert_eq!(msg.author, "/u/ferris");
        assert_eq!(msg.author_link, "https://www.reddit.com/u/ferris");
    }

    #[test]
    fn missing_body_is_not_renderable() {
        assert!(render(&post_with_body(None)).is_none());
    }

    #[test]
    fn blank_body_is_not_renderable() {
        assert!(render(&post_with_body(Some(""))).is_none());
        assert!(render(&post_with_body(Some(" \n\t"))).is_none());
    }

    #[test]
    fn extracts_first_image_src() {
        let body = r#"<table><tr><td><a href="/x"><img src="https://i.redd.it/one.png" alt="one"/></a></td>
            <td><img src="https://i.redd.it/two.png"/></td></tr></table>"#;
        let msg = render(&post_with_body(Some(body))).unwrap();
        assert_eq!(msg.image.as_deref(), Some("https://i.redd.it/one.png"));
        assert!(msg.excerpt.is_none(), "no .md container means no excerpt");
    }

    #[test]
    fn empty_image_src_is_ignored() {
        let msg = render(&post_with_body(Some(r#"<img src=""/>"#))).unwrap();
        assert!(msg.image.is_none());
    }

    #[test]
    fn reddit_self_post_excerpt_is_trimmed_and_decoded() {
        let body = "<!-- SC_OFF --><div class=\"md\">\n<p>Fish &amp; chips</p>\n</div><!-- SC_ON --> \
                    &#32; submitted by &#32; <a href=\"https://www.reddit.com/user/ferris\"> /u/ferris </a>";
        let msg = render(&post_with_body(Some(body))).unwrap();
        assert_eq!(msg.excerpt.as_deref(), Some("Fish & chips"));
    }

    #[test]
    fn whitespace_only_md_gives_no_excerpt() {
        let msg = render(&post_with_body(Some("<div class=\"md\">  \n </div>"))).unwrap();
        assert!(msg.excerpt.is_none());
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let post = Post {
            id: "x".to_string(),
            title: None,
            link: None,
            author: None,
            published: None,
            body: Some("<p></p>".to_string()),
        };
        let msg = render(&post).unwrap();
        assert_eq!(msg.title, FALLBACK_TITLE);
        assert_eq!(msg.link, FALLBACK_LINK);
        assert_eq!(msg.author, FALLBACK_AUTHOR);
        assert_eq!(msg.author_link, format!("{AUTHOR_URL_PREFIX}{FALLBACK_AUTHOR}"));
        assert!(msg.excerpt.is_none());
        assert!(msg.image.is_none());
    }
}
