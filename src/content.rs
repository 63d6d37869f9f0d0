use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::sync::OnceLock;

use crate::data_models::{ScrapedArticle, article_url};
use crate::wiki_client::WikiSource;

pub const PLACEHOLDER_HTML: &str = "<p>No more articles found.</p>";

static CONTENT_SELECTOR: OnceLock<Selector> = OnceLock::new();
static FALLBACK_CONTENT_SELECTOR: OnceLock<Selector> = OnceLock::new();
static CITATION_SELECTOR: OnceLock<Selector> = OnceLock::new();
static IMG_SELECTOR: OnceLock<Selector> = OnceLock::new();

// page indicators (protection lock, featured star) carry their own
// mw-parser-output ahead of the article body
fn content_selector() -> &'static Selector {
    CONTENT_SELECTOR.get_or_init(|| {
        Selector::parse("#mw-content-text .mw-parser-output").expect("valid content selector")
    })
}

fn fallback_content_selector() -> &'static Selector {
    FALLBACK_CONTENT_SELECTOR
        .get_or_init(|| Selector::parse("div.mw-parser-output").expect("valid content selector"))
}

// footnote markers, the reference list, and its back-links
fn citation_selector() -> &'static Selector {
    CITATION_SELECTOR.get_or_init(|| {
        Selector::parse("sup.reference, ol.references, div.reflist, .mw-cite-backlink")
            .expect("valid citation selector")
    })
}

fn img_selector() -> &'static Selector {
    IMG_SELECTOR.get_or_init(|| Selector::parse("img").expect("valid img selector"))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedContent {
    pub html: String,
    pub image_urls: Vec<String>,
}

/// Extracts the article body from a rendered Wikipedia page with citation
/// markup removed, plus absolute URLs of the images in it.
///
/// Pages without a `mw-parser-output` container are returned as they are.
pub fn clean_article_html(raw_html: &str, page_url: &str) -> CleanedContent {
    let mut document = Html::parse_document(raw_html);
    let base = Url::parse(page_url).ok();

    let container_id = document
        .select(content_selector())
        .next()
        .or_else(|| document.select(fallback_content_selector()).next())
        .map(|el| el.id());
    let Some(container_id) = container_id else {
        return CleanedContent {
            html: raw_html.to_string(),
            image_urls: image_urls(document.root_element(), base.as_ref()),
        };
    };

    let doomed: Vec<_> = match document.tree.get(container_id).and_then(ElementRef::wrap) {
        Some(container) => container.select(citation_selector()).map(|el| el.id()).collect(),
        None => Vec::new(),
    };
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    match document.tree.get(container_id).and_then(ElementRef::wrap) {
        Some(container) => CleanedContent {
            html: container.html(),
            image_urls: image_urls(container, base.as_ref()),
        },
        None => CleanedContent {
            html: raw_html.to_string(),
            image_urls: Vec::new(),
        },
    }
}

fn image_urls(root: ElementRef, base: Option<&Url>) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for img in root.select(img_selector()) {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        let resolved = match base {
            Some(base) => base.join(src),
            None => Url::parse(src),
        };
        if let Ok(resolved) = resolved {
            if resolved.scheme() == "http" || resolved.scheme() == "https" {
                let resolved = resolved.to_string();
                if !urls.contains(&resolved) {
                    urls.push(resolved);
                }
            }
        }
    }
    urls
}

/// Fetches live article pages and reduces them to displayable content.
pub struct ContentResolver {
    source: Arc<dyn WikiSource>,
}

impl ContentResolver {
    pub fn new(source: Arc<dyn WikiSource>) -> ContentResolver {
        ContentResolver { source }
    }

    /// Never fails: a page that cannot be fetched becomes a placeholder.
    pub async fn scrape(&self, title: &str) -> ScrapedArticle {
        let url = article_url(&self.source.base_url(), title);
        match self.source.fetch_raw_html(title).await {
            Ok(raw_html) => {
                let cleaned = clean_article_html(&raw_html, &url);
                ScrapedArticle {
                    title: title.to_string(),
                    url,
                    content_html: cleaned.html,
                    image_urls: cleaned.image_urls,
                }
            }
            Err(e) => {
                log::warn!("error fetching article {title:?}: {e:#}");
                ScrapedArticle {
                    title: title.to_string(),
                    url,
                    content_html: PLACEHOLDER_HTML.to_string(),
                    image_urls: Vec::new(),
                }
            }
        }
    }
}
