use axum::{Json, extract::State, response::Html};
use std::time::Instant;

use crate::data_models::ScrapedArticle;

use super::AppState;
use super::models::{
    ArticleRequest, ArticlesResponse, NextArticleRequest, NextRequest, NextResponse,
    SearchRequest,
};

pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.as_ref().clone())
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<ArticlesResponse> {
    let (session_id, session) = state.sessions.get_or_create(request.session_id.as_deref());
    let search_term = request.search_term.unwrap_or_default();
    if search_term.trim().is_empty() {
        return Json(ArticlesResponse {
            articles: Vec::new(),
            session_id,
        });
    }

    let start = Instant::now();
    let mut session = session.lock().await;
    let articles = state.discovery.search(&mut session, &search_term).await;
    log::info!(
        "search {search_term:?} -> {} articles in {}ms",
        articles.len(),
        start.elapsed().as_millis()
    );

    Json(ArticlesResponse {
        articles,
        session_id,
    })
}

pub async fn next_article_handler(
    State(state): State<AppState>,
    Json(request): Json<NextArticleRequest>,
) -> Json<ArticlesResponse> {
    let (session_id, session) = state.sessions.get_or_create(request.session_id.as_deref());

    let start = Instant::now();
    let mut session = session.lock().await;
    let articles = state.discovery.next_batch(&mut session).await;
    log::info!(
        "next_article -> {} articles ({} candidates left) in {}ms",
        articles.len(),
        session.remaining(),
        start.elapsed().as_millis()
    );

    Json(ArticlesResponse {
        articles,
        session_id,
    })
}

pub async fn next_handler(
    State(state): State<AppState>,
    Json(request): Json<NextRequest>,
) -> Json<NextResponse> {
    let (session_id, session) = state.sessions.get_or_create(request.session_id.as_deref());
    let exhausted = |session_id| {
        Json(NextResponse {
            title: None,
            iframe_url: None,
            session_id,
        })
    };

    let Some(current_title) = request.current_title.filter(|t| !t.trim().is_empty()) else {
        return exhausted(session_id);
    };

    let mut session = session.lock().await;
    let next = state
        .discovery
        .next_from(&mut session, &current_title, request.mode, 1)
        .await
        .into_iter()
        .next();

    match next {
        Some(article) => {
            log::info!("next after {current_title:?}: {:?}", article.title);
            Json(NextResponse {
                title: Some(article.title),
                iframe_url: Some(article.url),
                session_id,
            })
        }
        None => {
            log::info!("nothing left after {current_title:?}");
            exhausted(session_id)
        }
    }
}

pub async fn article_handler(
    State(state): State<AppState>,
    Json(request): Json<ArticleRequest>,
) -> Json<ScrapedArticle> {
    Json(state.content.scrape(&request.title).await)
}
