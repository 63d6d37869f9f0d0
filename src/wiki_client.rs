use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::data_models::{WikiPage, article_url};
use crate::error::{WikiError, WikiResult};

const CATEGORY_PREFIX: &str = "Category:";

/// Everything the reader needs from Wikipedia.
///
/// Implemented by [`MediaWikiClient`] against the live API, and by the
/// in-memory `MockWiki` behind the `test-utils` feature.
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Ranked titles matching a free-text query, at most `limit` of them.
    async fn search(&self, term: &str, limit: usize) -> WikiResult<Vec<String>>;

    /// Looks up a single article. Disambiguation pages come back as
    /// [`WikiError::Ambiguous`] carrying their options.
    async fn get_page(&self, title: &str) -> WikiResult<WikiPage>;

    /// Main-namespace members of a category, name given without prefix.
    async fn category_members(&self, category: &str) -> WikiResult<Vec<String>>;

    /// The rendered article HTML as served to browsers.
    async fn fetch_raw_html(&self, title: &str) -> WikiResult<String>;

    /// Base URL of the wiki, e.g. `https://en.wikipedia.org`.
    fn base_url(&self) -> String;
}

pub struct MediaWikiClient {
    client: reqwest::Client,
    api_url: String,
    base_url: String,
}

impl MediaWikiClient {
    pub fn new(config: &Config) -> anyhow::Result<MediaWikiClient> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(MediaWikiClient {
            client,
            api_url: config.api_url(),
            base_url: config.wiki_base_url(),
        })
    }

    async fn api_query(&self, params: &[(&str, &str)]) -> WikiResult<ApiResponse> {
        let res = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let body: ApiResponse = res.json().await?;
        if let Some(err) = body.error {
            return Err(WikiError::Malformed(format!("{}: {}", err.code, err.info)));
        }
        Ok(body)
    }
}

#[async_trait]
impl WikiSource for MediaWikiClient {
    async fn search(&self, term: &str, limit: usize) -> WikiResult<Vec<String>> {
        let limit = limit.to_string();
        let body = self
            .api_query(&[
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", &limit),
                ("srprop", ""),
            ])
            .await?;
        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn get_page(&self, title: &str) -> WikiResult<WikiPage> {
        let body = self
            .api_query(&[
                ("titles", title),
                ("redirects", "1"),
                ("prop", "info|pageprops|links|categories"),
                ("inprop", "url"),
                ("ppprop", "disambiguation"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
                ("clshow", "!hidden"),
                ("cllimit", "max"),
            ])
            .await?;
        page_from_response(body, title, &self.base_url)
    }

    async fn category_members(&self, category: &str) -> WikiResult<Vec<String>> {
        let cmtitle = format!("{CATEGORY_PREFIX}{category}");
        let body = self
            .api_query(&[
                ("list", "categorymembers"),
                ("cmtitle", &cmtitle),
                ("cmnamespace", "0"),
                ("cmtype", "page"),
                ("cmlimit", "max"),
            ])
            .await?;
        Ok(body
            .query
            .map(|q| q.categorymembers.into_iter().map(|m| m.title).collect())
            .unwrap_or_default())
    }

    async fn fetch_raw_html(&self, title: &str) -> WikiResult<String> {
        let url = article_url(&self.base_url, title);
        let res = self.client.get(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(WikiError::NotFound(title.to_string()));
        }
        let body = res.error_for_status()?.text().await?;
        Ok(body)
    }

    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize, Default)]
struct ApiQuery {
    #[serde(default)]
    pages: Vec<ApiPage>,
    #[serde(default)]
    search: Vec<TitleEntry>,
    #[serde(default)]
    categorymembers: Vec<TitleEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<TitleEntry>,
    #[serde(default)]
    categories: Vec<TitleEntry>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TitleEntry {
    title: String,
}

/// Turns a `prop=info|pageprops|links|categories` response into a page.
pub fn page_from_response(
    body: ApiResponse,
    requested: &str,
    base_url: &str,
) -> WikiResult<WikiPage> {
    let page = body
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| WikiError::NotFound(requested.to_string()))?;

    if page.missing || page.invalid {
        return Err(WikiError::NotFound(page.title));
    }

    let links: Vec<String> = page.links.into_iter().map(|l| l.title).collect();

    let is_disambiguation = page
        .pageprops
        .as_ref()
        .is_some_and(|p| p.disambiguation.is_some());
    if is_disambiguation {
        return Err(WikiError::Ambiguous {
            title: page.title,
            options: links,
        });
    }

    let categories = page
        .categories
        .into_iter()
        .map(|c| {
            c.title
                .strip_prefix(CATEGORY_PREFIX)
                .unwrap_or(&c.title)
                .to_string()
        })
        .collect();

    let url = page
        .fullurl
        .unwrap_or_else(|| article_url(base_url, &page.title));

    Ok(WikiPage::new(page.title, url, links, categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://en.wikipedia.org";

    fn response(value: serde_json::Value) -> ApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_page_from_response_regular_article() {
        let body = response(json!({
            "batchcomplete": true,
            "query": {"pages": [{
                "pageid": 974,
                "ns": 0,
                "title": "Ada Lovelace",
                "fullurl": "https://en.wikipedia.org/wiki/Ada_Lovelace",
                "links": [{"ns": 0, "title": "Charles Babbage"}, {"ns": 0, "title": "Analytical Engine"}],
                "categories": [{"ns": 14, "title": "Category:English mathematicians"}]
            }]}
        }));
        let page = page_from_response(body, "Ada Lovelace", BASE).unwrap();
        assert_eq!(page.title, "Ada Lovelace");
        assert_eq!(page.links, vec!["Charles Babbage", "Analytical Engine"]);
        assert_eq!(page.categories, vec!["English mathematicians"]);
    }

    #[test]
    fn test_page_from_response_missing() {
        let body = response(json!({
            "query": {"pages": [{"ns": 0, "title": "Xyzzy Plugh", "missing": true}]}
        }));
        let err = page_from_response(body, "Xyzzy Plugh", BASE).unwrap_err();
        assert!(matches!(err, WikiError::NotFound(t) if t == "Xyzzy Plugh"));
    }

    #[test]
    fn test_page_from_response_disambiguation() {
        let body = response(json!({
            "query": {"pages": [{
                "ns": 0,
                "title": "Mercury",
                "pageprops": {"disambiguation": ""},
                "links": [{"ns": 0, "title": "Mercury (planet)"}, {"ns": 0, "title": "Mercury (element)"}]
            }]}
        }));
        match page_from_response(body, "Mercury", BASE) {
            Err(WikiError::Ambiguous { title, options }) => {
                assert_eq!(title, "Mercury");
                assert_eq!(options, vec!["Mercury (planet)", "Mercury (element)"]);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_page_from_response_no_pages() {
        let body = response(json!({"batchcomplete": true}));
        assert!(matches!(
            page_from_response(body, "Nothing", BASE),
            Err(WikiError::NotFound(_))
        ));
    }

    #[test]
    fn test_page_from_response_builds_url_when_absent() {
        let body = response(json!({
            "query": {"pages": [{"ns": 0, "title": "Grace Hopper"}]}
        }));
        let page = page_from_response(body, "Grace Hopper", BASE).unwrap();
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Grace_Hopper");
        assert!(page.links.is_empty());
    }
}
