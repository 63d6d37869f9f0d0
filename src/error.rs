use thiserror::Error;

/// Failures from a [`crate::wiki_client::WikiSource`] lookup.
///
/// None of these are fatal for a traversal: callers skip the candidate and
/// move on.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("page not found: {0}")]
    NotFound(String),

    #[error("{title} is a disambiguation page with {} options", options.len())]
    Ambiguous { title: String, options: Vec<String> },

    #[error("request failed: {0}")]
    Transient(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

pub type WikiResult<T> = std::result::Result<T, WikiError>;
