use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Build the canonical article URL for `title` on the given wiki host,
/// e.g. `https://en.wikipedia.org/wiki/Ada_Lovelace`. Characters such as
/// `?` and `#` are percent-encoded so they stay part of the title.
pub fn article_url(wiki_base_url: &str, title: &str) -> String {
    let segment = title.replace(' ', "_");
    let Ok(mut url) = Url::parse(wiki_base_url) else {
        return format!("{wiki_base_url}/wiki/{segment}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["wiki", segment.as_str()]);
    }
    url.to_string()
}

/// A titled link to an article, rendered client-side in an iframe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    pub title: String,
    pub url: String,
}

impl ArticleRef {
    pub fn new(wiki_base_url: &str, title: &str) -> ArticleRef {
        ArticleRef {
            title: title.to_string(),
            url: article_url(wiki_base_url, title),
        }
    }
}

/// Cleaned main content of a live article page.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScrapedArticle {
    pub title: String,
    pub url: String,
    pub content_html: String,
    pub image_urls: Vec<String>,
}

/// A resolved article as returned by a page lookup.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiPage {
    pub title: String,
    pub url: String,
    /// Outbound links to main-namespace articles, in page order.
    pub links: Vec<String>,
    /// Category names without the `Category:` prefix.
    pub categories: Vec<String>,
}

impl WikiPage {
    pub fn new(
        title: String,
        url: String,
        links: Vec<String>,
        categories: Vec<String>,
    ) -> WikiPage {
        WikiPage {
            title,
            url,
            links,
            categories,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// Follow the current page's outbound article links.
    #[default]
    Links,
    /// Walk the other members of the current page's first category.
    Category,
}
