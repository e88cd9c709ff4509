use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::metrics::{EntryCollector, EntryMetrics};

use super::execution::execute_request;
use super::limits::{RateLimiter, RequestLimiter};
use super::request::{RequestTemplate, resolve_url};
use super::{LoadFailure, LoadParams, LoadRequest, LoadRunner};

/// Runs one entry with `concurrency` workers sharing a budget of
/// `max_requests` requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpLoadRunner;

impl HttpLoadRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LoadRunner for HttpLoadRunner {
    async fn run(
        &self,
        request: &LoadRequest,
        params: &LoadParams,
    ) -> Result<EntryMetrics, LoadFailure> {
        let url = resolve_url(request)
            .map_err(|err| LoadFailure::new(format!("Invalid url '{}': {}", request.url, err)))?;
        let client = Client::builder()
            .timeout(params.timeout)
            .danger_accept_invalid_certs(params.insecure)
            .build()
            .map_err(|err| LoadFailure::new(format!("Failed to build HTTP client: {}", err)))?;

        let template = Arc::new(RequestTemplate::new(request, url));
        let limiter = Arc::new(RequestLimiter::new(params.max_requests));
        let rate = params
            .requests_per_second
            .filter(|rate| *rate > 0)
            .map(|rate| Arc::new(RateLimiter::per_second(rate)));
        let (sample_tx, mut sample_rx) = mpsc::unbounded_channel();

        debug!(
            "Running {} {} with {} worker(s)",
            request.method, request.url, params.concurrency
        );
        let started = Instant::now();
        let mut workers = Vec::new();
        for _ in 0..params.concurrency.max(1) {
            let client = client.clone();
            let template = template.clone();
            let limiter = limiter.clone();
            let rate = rate.clone();
            let sample_tx = sample_tx.clone();
            workers.push(tokio::spawn(async move {
                while limiter.try_reserve() {
                    if let Some(rate) = rate.as_ref()
                        && !rate.acquire().await
                    {
                        break;
                    }
                    let sample = execute_request(&client, &template).await;
                    if sample_tx.send(sample).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(sample_tx);

        let mut collector = EntryCollector::new(&request.url);
        while let Some(sample) = sample_rx.recv().await {
            collector.record(sample);
        }
        for worker in workers {
            if let Err(err) = worker.await {
                warn!("Load worker failed: {}", err);
            }
        }
        let elapsed = started.elapsed();

        if collector.all_unanswered() {
            let attempted = collector.total_requests();
            return Err(LoadFailure::with_partial(
                format!(
                    "None of the {} request(s) to '{}' got a response",
                    attempted, request.url
                ),
                collector.finish_partial(elapsed),
            ));
        }
        let metrics = collector.finish(elapsed);
        debug!(
            "Finished {}: {} request(s), {} error(s)",
            request.url, metrics.total_requests, metrics.total_errors
        );
        Ok(metrics)
    }
}
