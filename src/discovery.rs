use std::sync::Arc;

use crate::config::Config;
use crate::data_models::{ArticleRef, TraversalMode};
use crate::error::{WikiError, WikiResult};
use crate::resolver::{is_disambiguation_option, resolve_page};
use crate::session::SearchSession;
use crate::wiki_client::WikiSource;

/// Rejects empty and purely numeric titles ("1990"), which show up as
/// search index noise.
pub fn is_valid_title(title: &str) -> bool {
    let title = title.trim();
    !title.is_empty() && !title.chars().all(char::is_numeric)
}

/// Produces the next unseen articles for a session, either from its cached
/// search results or by walking outward from the article being read.
pub struct Discovery {
    source: Arc<dyn WikiSource>,
    search_limit: usize,
    page_size: usize,
    max_disambiguation_depth: usize,
}

impl Discovery {
    pub fn new(source: Arc<dyn WikiSource>, config: &Config) -> Discovery {
        Discovery {
            source,
            search_limit: config.search_limit,
            page_size: config.page_size.max(1),
            max_disambiguation_depth: config.max_disambiguation_depth,
        }
    }

    /// Runs a new search on the session and returns its first batch.
    pub async fn search(&self, session: &mut SearchSession, term: &str) -> Vec<ArticleRef> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        let candidates = match self.source.search(term, self.search_limit).await {
            Ok(titles) => titles,
            Err(e) => {
                log::error!("search for {term:?} failed: {e:#}");
                Vec::new()
            }
        };
        log::info!("search {term:?}: {} candidates", candidates.len());

        session.start(term, candidates);
        self.next_batch(session).await
    }

    /// Continues through the session's cached search results.
    ///
    /// Empty once the results are used up, or when no search has been made.
    pub async fn next_batch(&self, session: &mut SearchSession) -> Vec<ArticleRef> {
        let mut articles = Vec::new();
        if !session.is_active() {
            return articles;
        }

        while articles.len() < self.page_size {
            let Some(candidate) = session.next_candidate() else {
                break;
            };
            if !is_valid_title(&candidate) || session.has_seen(&candidate) {
                continue;
            }

            let Some(page) =
                resolve_page(self.source.as_ref(), &candidate, self.max_disambiguation_depth)
                    .await
            else {
                continue;
            };
            if !is_valid_title(&page.title) || !session.mark_seen(&page.title) {
                continue;
            }

            articles.push(ArticleRef {
                title: page.title,
                url: page.url,
            });
        }

        articles
    }

    /// Walks outward from `current_title` by links or by category, returning
    /// up to `limit` articles the session has not been shown yet.
    pub async fn next_from(
        &self,
        session: &mut SearchSession,
        current_title: &str,
        mode: TraversalMode,
        limit: usize,
    ) -> Vec<ArticleRef> {
        let candidates = match self.neighbours(current_title, mode).await {
            Ok(titles) => titles,
            Err(e) => {
                log::warn!("could not expand {current_title:?} ({mode:?}): {e:#}");
                return Vec::new();
            }
        };

        session.mark_seen(current_title);
        let base_url = self.source.base_url();
        let mut articles = Vec::new();
        for title in candidates {
            if articles.len() >= limit {
                break;
            }
            if !is_valid_title(&title) || !session.mark_seen(&title) {
                continue;
            }
            articles.push(ArticleRef::new(&base_url, &title));
        }
        articles
    }

    /// Candidate titles around `title`: its outbound links in page order, or
    /// the sorted members of its first category.
    async fn neighbours(&self, title: &str, mode: TraversalMode) -> WikiResult<Vec<String>> {
        let page = match self.source.get_page(title).await {
            Ok(page) => page,
            Err(WikiError::Ambiguous { options, .. }) if mode == TraversalMode::Links => {
                // a disambiguation page's options are its links
                return Ok(options
                    .into_iter()
                    .filter(|o| !is_disambiguation_option(o))
                    .collect());
            }
            Err(e) => return Err(e),
        };

        match mode {
            TraversalMode::Links => Ok(page.links),
            TraversalMode::Category => {
                let Some(category) = page.categories.first() else {
                    log::debug!("{title:?} has no categories");
                    return Ok(Vec::new());
                };
                let mut members = self.source.category_members(category).await?;
                members.sort();
                Ok(members)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_title() {
        assert!(is_valid_title("Ada Lovelace"));
        assert!(is_valid_title("1984 (novel)"));
        assert!(is_valid_title("Route 66"));
        assert!(!is_valid_title("1990"));
        assert!(!is_valid_title(""));
        assert!(!is_valid_title("   "));
        assert!(!is_valid_title("٢٠٢٤"));
    }
}
