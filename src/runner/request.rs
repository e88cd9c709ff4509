use std::collections::BTreeMap;

use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request};
use tracing::warn;
use url::Url;

use super::LoadRequest;

/// Parses the entry url and appends the recorded query pairs it does not
/// already carry.
pub(super) fn resolve_url(request: &LoadRequest) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&request.url)?;
    let existing: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    let missing: Vec<_> = request
        .query_string
        .iter()
        .filter(|param| {
            !existing
                .iter()
                .any(|(name, value)| name == &param.name && value == &param.value)
        })
        .collect();
    if !missing.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for param in missing {
            pairs.append_pair(&param.name, &param.value);
        }
    }
    Ok(url)
}

/// Converts recorded headers into a `HeaderMap`. HTTP/2 pseudo-headers and
/// `Content-Length` are left to the client; invalid pairs are skipped.
pub(super) fn build_headers(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if name.starts_with(':') {
            continue;
        }
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            warn!("Skipping invalid header name '{}'", name);
            continue;
        };
        if header_name == CONTENT_LENGTH {
            continue;
        }
        let Ok(header_value) = HeaderValue::from_str(value) else {
            warn!("Skipping invalid value for header '{}'", name);
            continue;
        };
        map.insert(header_name, header_value);
    }
    map
}

/// Everything needed to rebuild the same request for every worker iteration.
#[derive(Debug, Clone)]
pub(super) struct RequestTemplate {
    method: reqwest::Method,
    url: Url,
    headers: HeaderMap,
    body: Option<String>,
}

impl RequestTemplate {
    pub(super) fn new(request: &LoadRequest, url: Url) -> Self {
        Self {
            method: request.method.to_reqwest(),
            url,
            headers: build_headers(&request.headers),
            body: request.body.clone(),
        }
    }

    pub(super) fn build(&self, client: &Client) -> Result<Request, reqwest::Error> {
        let mut builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        builder.build()
    }
}
