use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;

use crate::metrics::{RequestSample, SampleOutcome};

use super::request::RequestTemplate;

pub(super) async fn execute_request(client: &Client, template: &RequestTemplate) -> RequestSample {
    let started = Instant::now();
    let outcome = match template.build(client) {
        Ok(request) => execute_request_status(client, request).await,
        Err(_) => SampleOutcome::Transport,
    };
    RequestSample {
        latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        outcome,
    }
}

async fn execute_request_status(client: &Client, request: reqwest::Request) -> SampleOutcome {
    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            drain_response_body(response)
                .await
                .map_or_else(|err| failure_outcome(&err), |_bytes| SampleOutcome::Status(status))
        }
        Err(err) => failure_outcome(&err),
    }
}

fn failure_outcome(err: &reqwest::Error) -> SampleOutcome {
    if err.is_timeout() {
        SampleOutcome::Timeout
    } else {
        SampleOutcome::Transport
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
