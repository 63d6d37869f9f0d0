// In-memory WikiSource for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::data_models::{WikiPage, article_url};
use crate::error::{WikiError, WikiResult};
use crate::wiki_client::WikiSource;

const MOCK_BASE_URL: &str = "https://en.wikipedia.org";

enum MockEntry {
    Article(WikiPage),
    Disambiguation(Vec<String>),
}

/// A scripted wiki. Unknown titles are not found and unknown search terms
/// match nothing.
pub struct MockWiki {
    search_results: HashMap<String, Vec<String>>,
    entries: HashMap<String, MockEntry>,
    categories: HashMap<String, Vec<String>>,
    html: HashMap<String, String>,
    failing: HashSet<String>,
    page_calls: Mutex<Vec<String>>,
    search_calls: Mutex<Vec<String>>,
}

impl Default for MockWiki {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWiki {
    pub fn new() -> Self {
        Self {
            search_results: HashMap::new(),
            entries: HashMap::new(),
            categories: HashMap::new(),
            html: HashMap::new(),
            failing: HashSet::new(),
            page_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, term: &str, titles: &[&str]) -> Self {
        self.search_results
            .insert(term.to_string(), titles.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_article(mut self, title: &str, links: &[&str], categories: &[&str]) -> Self {
        let page = WikiPage::new(
            title.to_string(),
            article_url(MOCK_BASE_URL, title),
            links.iter().map(|l| l.to_string()).collect(),
            categories.iter().map(|c| c.to_string()).collect(),
        );
        self.entries
            .insert(title.to_string(), MockEntry::Article(page));
        self
    }

    /// Registers plain articles with no links or categories.
    pub fn with_articles(self, titles: &[&str]) -> Self {
        titles
            .iter()
            .fold(self, |wiki, title| wiki.with_article(title, &[], &[]))
    }

    pub fn with_disambiguation(mut self, title: &str, options: &[&str]) -> Self {
        self.entries.insert(
            title.to_string(),
            MockEntry::Disambiguation(options.iter().map(|o| o.to_string()).collect()),
        );
        self
    }

    pub fn with_category(mut self, name: &str, members: &[&str]) -> Self {
        self.categories
            .insert(name.to_string(), members.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_html(mut self, title: &str, html: &str) -> Self {
        self.html.insert(title.to_string(), html.to_string());
        self
    }

    /// Every lookup of `key` (a title or a search term) fails as if the
    /// service were down.
    pub fn with_failure(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Titles passed to `get_page`, in call order.
    pub fn page_calls(&self) -> Vec<String> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    fn check_failure(&self, key: &str) -> WikiResult<()> {
        if self.failing.contains(key) {
            return Err(WikiError::Malformed(format!("service unavailable for {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl WikiSource for MockWiki {
    async fn search(&self, term: &str, limit: usize) -> WikiResult<Vec<String>> {
        self.search_calls.lock().unwrap().push(term.to_string());
        self.check_failure(term)?;
        Ok(self
            .search_results
            .get(term)
            .map(|titles| titles.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_page(&self, title: &str) -> WikiResult<WikiPage> {
        self.page_calls.lock().unwrap().push(title.to_string());
        self.check_failure(title)?;
        match self.entries.get(title) {
            Some(MockEntry::Article(page)) => Ok(page.clone()),
            Some(MockEntry::Disambiguation(options)) => Err(WikiError::Ambiguous {
                title: title.to_string(),
                options: options.clone(),
            }),
            None => Err(WikiError::NotFound(title.to_string())),
        }
    }

    async fn category_members(&self, category: &str) -> WikiResult<Vec<String>> {
        self.check_failure(category)?;
        Ok(self.categories.get(category).cloned().unwrap_or_default())
    }

    async fn fetch_raw_html(&self, title: &str) -> WikiResult<String> {
        self.check_failure(title)?;
        self.html
            .get(title)
            .cloned()
            .ok_or_else(|| WikiError::NotFound(title.to_string()))
    }

    fn base_url(&self) -> String {
        MOCK_BASE_URL.to_string()
    }
}
