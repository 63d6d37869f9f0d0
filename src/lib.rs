pub mod api;
pub mod config;
pub mod content;
pub mod data_models;
pub mod discovery;
pub mod error;
pub mod resolver;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod wiki_client;
