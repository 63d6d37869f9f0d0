use std::collections::HashSet;

use crate::data_models::WikiPage;
use crate::error::WikiError;
use crate::wiki_client::WikiSource;

/// Looks up `title`, following disambiguation pages to a concrete article.
///
/// Options are tried depth-first in listed order: when an option is itself a
/// disambiguation page its options are tried before the next sibling. Options
/// mentioning "disambiguation" are skipped, every title is looked up at most
/// once per call, and expansion stops after `max_depth` levels.
///
/// Not-found pages and failed lookups are skipped. Returns `None` when
/// nothing resolves.
pub async fn resolve_page(
    source: &dyn WikiSource,
    title: &str,
    max_depth: usize,
) -> Option<WikiPage> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut worklist: Vec<(String, usize)> = vec![(title.to_string(), 0)];

    while let Some((candidate, depth)) = worklist.pop() {
        if !visited.insert(candidate.clone()) {
            log::debug!("already tried {candidate:?}, skipping");
            continue;
        }

        match source.get_page(&candidate).await {
            Ok(page) => return Some(page),
            Err(WikiError::Ambiguous { options, .. }) => {
                if depth >= max_depth {
                    log::debug!("{candidate:?} is ambiguous at depth {depth}, not expanding");
                    continue;
                }
                log::debug!("{candidate:?} is ambiguous: {options:?}");
                // reversed so the first option is popped first
                let next = options
                    .into_iter()
                    .filter(|o| !is_disambiguation_option(o) && !visited.contains(o))
                    .rev()
                    .map(|o| (o, depth + 1));
                worklist.extend(next);
            }
            Err(WikiError::NotFound(_)) => {
                log::debug!("no page for {candidate:?}");
            }
            Err(e) => {
                log::warn!("lookup of {candidate:?} failed: {e:#}");
            }
        }
    }

    log::info!("no suitable page found for {title:?}");
    None
}

pub fn is_disambiguation_option(option: &str) -> bool {
    option.to_lowercase().contains("disambiguation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockWiki;

    #[tokio::test]
    async fn test_resolves_plain_article() {
        let wiki = MockWiki::new().with_article("Ada Lovelace", &[], &[]);
        let page = resolve_page(&wiki, "Ada Lovelace", 2).await.unwrap();
        assert_eq!(page.title, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_skips_disambiguation_options() {
        let wiki = MockWiki::new()
            .with_disambiguation("Foo", &["Foo (disambiguation)", "Foo (band)"])
            .with_article("Foo (disambiguation)", &[], &[])
            .with_article("Foo (band)", &[], &[]);

        let page = resolve_page(&wiki, "Foo", 2).await.unwrap();
        assert_eq!(page.title, "Foo (band)");
        assert_eq!(wiki.page_calls(), vec!["Foo", "Foo (band)"]);
    }

    #[tokio::test]
    async fn test_first_resolvable_option_wins() {
        let wiki = MockWiki::new()
            .with_disambiguation("Mercury", &["Mercury (planet)", "Mercury (element)"])
            .with_article("Mercury (element)", &[], &[]);

        let page = resolve_page(&wiki, "Mercury", 2).await.unwrap();
        assert_eq!(page.title, "Mercury (element)");
    }

    #[tokio::test]
    async fn test_nested_option_tried_before_sibling() {
        let wiki = MockWiki::new()
            .with_disambiguation("A", &["B", "C"])
            .with_disambiguation("B", &["B1"])
            .with_article("B1", &[], &[])
            .with_article("C", &[], &[]);

        let page = resolve_page(&wiki, "A", 2).await.unwrap();
        assert_eq!(page.title, "B1");
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let wiki = MockWiki::new()
            .with_disambiguation("A", &["B"])
            .with_disambiguation("B", &["A", "C"])
            .with_disambiguation("C", &["A", "B"]);

        assert!(resolve_page(&wiki, "A", 10).await.is_none());
        assert_eq!(wiki.page_calls(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_depth_bound() {
        let wiki = MockWiki::new()
            .with_disambiguation("L0", &["L1"])
            .with_disambiguation("L1", &["L2"])
            .with_article("L2", &[], &[]);

        assert!(resolve_page(&wiki, "L0", 1).await.is_none());
        assert_eq!(resolve_page(&wiki, "L0", 2).await.unwrap().title, "L2");
    }

    #[tokio::test]
    async fn test_missing_and_failing_pages_resolve_to_none() {
        let wiki = MockWiki::new().with_failure("Broken");
        assert!(resolve_page(&wiki, "Nowhere", 2).await.is_none());
        assert!(resolve_page(&wiki, "Broken", 2).await.is_none());
    }

    #[test]
    fn test_is_disambiguation_option() {
        assert!(is_disambiguation_option("Foo (Disambiguation)"));
        assert!(!is_disambiguation_option("Foo (band)"));
    }
}
