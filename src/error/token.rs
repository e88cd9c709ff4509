use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token request to '{url}' failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Token endpoint '{url}' answered with status {status}.")]
    Status { url: String, status: u16 },
    #[error("Failed to read token body from '{url}': {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Token endpoint '{url}' returned an empty body.")]
    EmptyBody { url: String },
    #[error("Failed to build token client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
