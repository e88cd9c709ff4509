//! Bearer token acquisition for authenticated entries.
mod cache;
mod fetcher;


pub use cache::TokenCache;
pub use fetcher::{ReqwestTokenFetcher, TokenFetcher};

/// Which header receives the token, and which entries qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub header_name: String,
    pub url_substring: String,
}

impl TokenConfig {
    #[must_use]
    pub fn applies_to(&self, url: &str) -> bool {
        url.contains(&self.url_substring)
    }
}
