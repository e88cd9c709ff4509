use tracing::{debug, info};

use crate::error::TokenError;
use crate::runner::LoadRequest;

use super::{TokenConfig, TokenFetcher};

/// Holds the single token of a run. Once fetched it is never refetched.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: Option<String>,
    fetches: u64,
}

impl TokenCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            token: None,
            fetches: 0,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub const fn fetches(&self) -> u64 {
        self.fetches
    }

    /// Fetches the token on the first qualifying request, then overwrites the
    /// configured header when the request already carries it.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's `TokenError`, or `TokenError::EmptyBody` when the
    /// endpoint answered with blank content.
    pub async fn ensure_token<F>(
        &mut self,
        request: &mut LoadRequest,
        config: Option<&TokenConfig>,
        fetcher: &F,
    ) -> Result<(), TokenError>
    where
        F: TokenFetcher + ?Sized,
    {
        let Some(config) = config else {
            return Ok(());
        };
        if !config.applies_to(&request.url) {
            return Ok(());
        }

        let token = self.cached_or_fetch(request, fetcher).await?;
        let Some(value) = request.headers.get_mut(&config.header_name) else {
            debug!(
                "{} has no '{}' header; token not injected",
                request.url, config.header_name
            );
            return Ok(());
        };
        debug!("Injecting token into '{}' for {}", config.header_name, request.url);
        *value = token;
        Ok(())
    }

    async fn cached_or_fetch<F>(
        &mut self,
        request: &LoadRequest,
        fetcher: &F,
    ) -> Result<String, TokenError>
    where
        F: TokenFetcher + ?Sized,
    {
        if let Some(token) = self.token.as_ref() {
            return Ok(token.clone());
        }
        self.fetches = self.fetches.saturating_add(1);
        let body = fetcher.fetch(request.method, &request.url).await?;
        let token = body.trim().to_owned();
        if token.is_empty() {
            return Err(TokenError::EmptyBody {
                url: request.url.clone(),
            });
        }
        info!("Token obtained from {}", request.url);
        self.token = Some(token.clone());
        Ok(token)
    }
}
