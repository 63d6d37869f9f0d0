use serde::{Deserialize, Serialize};

use crate::data_models::{ArticleRef, TraversalMode};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchRequest {
    pub search_term: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct NextArticleRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct NextRequest {
    pub current_title: Option<String>,
    pub mode: TraversalMode,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleRef>,
    pub session_id: String,
}

/// Both fields are null once there is nothing left to show.
#[derive(Debug, Serialize, Deserialize)]
pub struct NextResponse {
    pub title: Option<String>,
    pub iframe_url: Option<String>,
    pub session_id: String,
}
