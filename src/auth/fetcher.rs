use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::TokenError;
use crate::scenario::HttpMethod;

#[async_trait]
pub trait TokenFetcher: Send + Sync {
    /// Issues the token request and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns a `TokenError` on transport failure, a non-success status or an
    /// unreadable body.
    async fn fetch(&self, method: HttpMethod, url: &str) -> Result<String, TokenError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTokenFetcher {
    client: Client,
}

impl ReqwestTokenFetcher {
    /// # Errors
    ///
    /// Returns `TokenError::BuildClient` when the client cannot be configured.
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|source| TokenError::BuildClient { source })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TokenFetcher for ReqwestTokenFetcher {
    async fn fetch(&self, method: HttpMethod, url: &str) -> Result<String, TokenError> {
        debug!("Fetching token with {} {}", method, url);
        let response = self
            .client
            .request(method.to_reqwest(), url)
            .send()
            .await
            .map_err(|source| TokenError::Fetch {
                url: url.to_owned(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|source| TokenError::Body {
            url: url.to_owned(),
            source,
        })
    }
}
