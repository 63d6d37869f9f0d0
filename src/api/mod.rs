use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::content::ContentResolver;
use crate::data_models::article_url;
use crate::discovery::Discovery;
use crate::session::SessionStore;
use crate::wiki_client::WikiSource;

pub mod handlers;
pub mod models;

const INDEX_TEMPLATE: &str = include_str!("index.html");

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<Discovery>,
    pub content: Arc<ContentResolver>,
    pub sessions: Arc<SessionStore>,
    pub index_html: Arc<String>,
}

impl AppState {
    pub fn new(source: Arc<dyn WikiSource>, config: &Config) -> AppState {
        let start_url = article_url(&source.base_url(), &config.start_title);
        AppState {
            discovery: Arc::new(Discovery::new(source.clone(), config)),
            content: Arc::new(ContentResolver::new(source)),
            sessions: Arc::new(SessionStore::new(config.shared_session)),
            index_html: Arc::new(render_index(&config.start_title, &start_url)),
        }
    }
}

/// Fills the start article into the page template as JS string literals.
pub fn render_index(start_title: &str, start_url: &str) -> String {
    INDEX_TEMPLATE
        .replace("\"__START_TITLE__\"", &js_string(start_title))
        .replace("\"__START_URL__\"", &js_string(start_url))
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route("/search", post(handlers::search_handler))
        .route("/next_article", post(handlers::next_article_handler))
        .route("/next", post(handlers::next_handler))
        .route("/article", post(handlers::article_handler))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index_embeds_start_article() {
        let html = render_index("Philosophy", "https://en.wikipedia.org/wiki/Philosophy");
        assert!(html.contains(r#"const START_TITLE = "Philosophy";"#));
        assert!(html.contains(r#"const START_URL = "https://en.wikipedia.org/wiki/Philosophy";"#));
        assert!(!html.contains("__START_TITLE__"));
    }

    #[test]
    fn test_render_index_escapes_script_close() {
        let html = render_index("</script><b>", "https://en.wikipedia.org/wiki/X");
        assert!(html.contains(r#"const START_TITLE = "<\/script><b>";"#));
    }
}
