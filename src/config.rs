use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        bind_addr: get_env_or_default("WIKIFLOW_BIND_ADDR", "127.0.0.1:5000"),
        wiki_lang: get_env_or_default("WIKI_LANG", "en"),
        user_agent: get_env_or_default("WIKI_USER_AGENT", "WikiFlow/1.0"),
        search_limit: get_env_parsed("SEARCH_LIMIT", 50),
        page_size: get_env_parsed("PAGE_SIZE", 2),
        max_disambiguation_depth: get_env_parsed("MAX_DISAMBIGUATION_DEPTH", 2),
        start_title: get_env_or_default("START_TITLE", "Philosophy"),
        shared_session: get_env_parsed("SHARED_SESSION", false),
        http_timeout: Duration::from_secs(get_env_parsed("HTTP_TIMEOUT_SECS", 30)),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Wikipedia language edition, e.g. `en` for en.wikipedia.org.
    pub wiki_lang: String,
    pub user_agent: String,
    /// Number of ranked titles cached per search.
    pub search_limit: usize,
    /// Articles returned per `/search` and `/next_article` call.
    pub page_size: usize,
    pub max_disambiguation_depth: usize,
    pub start_title: String,
    /// All clients share one session, so they explore the same result stream.
    pub shared_session: bool,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:5000".to_string(),
            wiki_lang: "en".to_string(),
            user_agent: "WikiFlow/1.0".to_string(),
            search_limit: 50,
            page_size: 2,
            max_disambiguation_depth: 2,
            start_title: "Philosophy".to_string(),
            shared_session: false,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn wiki_base_url(&self) -> String {
        format!("https://{}.wikipedia.org", self.wiki_lang)
    }

    pub fn api_url(&self) -> String {
        format!("{}/w/api.php", self.wiki_base_url())
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("invalid value {raw:?} for {key}, using default");
            default
        }),
        Err(_) => default,
    }
}
