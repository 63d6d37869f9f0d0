use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

use wikiflow::api::{AppState, create_router};
use wikiflow::config::CONFIG;
use wikiflow::wiki_client::MediaWikiClient;

#[derive(Parser, Debug)]
#[command(name = "wikiflow", about = "Infinite-scroll Wikipedia reader")]
struct Args {
    /// Address to listen on, overrides WIKIFLOW_BIND_ADDR
    #[arg(long)]
    bind: Option<String>,

    /// Wikipedia language edition, overrides WIKI_LANG
    #[arg(long)]
    lang: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();
    let mut config = CONFIG.clone();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(lang) = args.lang {
        config.wiki_lang = lang;
    }

    let source = Arc::new(MediaWikiClient::new(&config)?);
    let app = create_router(AppState::new(source, &config));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!(
        "serving {} on http://{} (shared session: {})",
        config.wiki_base_url(),
        config.bind_addr,
        config.shared_session
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
