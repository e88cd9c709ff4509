use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::progress::{ProgressStyle, build_progress_line};
use super::*;
use crate::auth::{TokenConfig, TokenFetcher};
use crate::config::{OutputTarget, RunConfig};
use crate::error::{AppError, ReportError, TokenError};
use crate::metrics::{EntryMetrics, PartialMetrics, PassReport};
use crate::report::ReportSink;
use crate::runner::{LoadFailure, LoadParams, LoadRequest, LoadRunner};
use crate::scenario::{Entry, HttpMethod, Page, Scenario};

#[derive(Debug, Clone)]
struct Invocation {
    url: String,
    concurrency: u64,
    max_requests: u64,
    authorization: Option<String>,
    started: Instant,
    finished: Instant,
}

#[derive(Clone, Default)]
struct RecordingRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LoadRunner for RecordingRunner {
    async fn run(
        &self,
        request: &LoadRequest,
        params: &LoadParams,
    ) -> Result<EntryMetrics, LoadFailure> {
        let started = Instant::now();
        let finished = Instant::now();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Invocation {
                url: request.url.clone(),
                concurrency: params.concurrency,
                max_requests: params.max_requests,
                authorization: request.headers.get("Authorization").cloned(),
                started,
                finished,
            });
        }
        if request.url.contains("fail") {
            return Err(LoadFailure::with_partial(
                "boom",
                PartialMetrics {
                    total_requests: Some(params.max_requests),
                    total_errors: Some(params.max_requests),
                    ..PartialMetrics::default()
                },
            ));
        }
        Ok(EntryMetrics {
            url: request.url.clone(),
            total_requests: params.max_requests,
            status_code: Some(200),
            ..EntryMetrics::default()
        })
    }
}

#[derive(Clone, Default)]
struct CountingFetcher {
    calls: Arc<AtomicU64>,
}

#[async_trait]
impl TokenFetcher for CountingFetcher {
    async fn fetch(&self, _method: HttpMethod, _url: &str) -> Result<String, TokenError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok("Bearer fresh".to_owned())
    }
}

struct FailingFetcher;

#[async_trait]
impl TokenFetcher for FailingFetcher {
    async fn fetch(&self, _method: HttpMethod, url: &str) -> Result<String, TokenError> {
        Err(TokenError::Status {
            url: url.to_owned(),
            status: 500,
        })
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    handled: Arc<Mutex<Vec<(u64, bool, usize)>>>,
    fail: bool,
}

impl RecordingSink {
    fn handled(&self) -> Vec<(u64, bool, usize)> {
        self.handled
            .lock()
            .map(|handled| handled.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn handle_pass(
        &mut self,
        pass: &PassReport,
        last: bool,
        _target: &OutputTarget,
    ) -> Result<(), ReportError> {
        if let Ok(mut handled) = self.handled.lock() {
            handled.push((pass.users, last, pass.entries.len()));
        }
        if self.fail && last {
            return Err(ReportError::from("export failed"));
        }
        Ok(())
    }
}

fn entry(url: &str, authorization: bool) -> Entry {
    let mut headers = BTreeMap::new();
    if authorization {
        headers.insert("Authorization".to_owned(), "Bearer recorded".to_owned());
    }
    Entry {
        method: HttpMethod::Get,
        url: url.to_owned(),
        headers,
        query_string: Vec::new(),
        body: None,
    }
}

fn scenario(pages: &[(&str, &[&str])]) -> Scenario {
    Scenario::new(
        pages
            .iter()
            .map(|(id, urls)| Page {
                id: (*id).to_owned(),
                title: format!("Page {}", id),
                entries: urls.iter().map(|url| entry(url, true)).collect(),
            })
            .collect(),
    )
}

fn run_config(users: u64, user_limit: u64, progressive: bool) -> RunConfig {
    RunConfig {
        scenario: PathBuf::from("session.har"),
        users,
        user_limit,
        wait: Duration::ZERO,
        timeout: Duration::from_secs(1),
        requests_per_second: None,
        progressive,
        insecure: false,
        verbose: false,
        output: OutputTarget::Terminal,
        token: None,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn progressive_run_steps_users_up_to_limit() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let sink = RecordingSink::default();
    let mut engine = ExecutionEngine::new(
        run_config(1, 3, true),
        runner.clone(),
        CountingFetcher::default(),
        sink.clone(),
        NoopProgress,
    );
    let outcome = engine
        .execute(&scenario(&[("p1", &["http://a/1"])]))
        .await
        .map_err(|err| err.to_string())?;

    let concurrency: Vec<u64> = runner.calls().iter().map(|call| call.concurrency).collect();
    if concurrency != [1, 2, 3] {
        return Err(format!("unexpected concurrency sequence {:?}", concurrency));
    }
    if sink.handled() != [(1, false, 1), (2, false, 1), (3, true, 1)] {
        return Err(format!("unexpected handled passes {:?}", sink.handled()));
    }
    let lasts: Vec<bool> = outcome.passes.iter().map(|pass| pass.last).collect();
    if lasts != [false, false, true] || outcome.exit != RunExit::Completed {
        return Err(format!("unexpected outcome {:?}", outcome));
    }
    if engine.phase() != EngineState::Done || engine.config().users != 3 {
        return Err(format!("unexpected final state {}", engine.phase()));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn progressive_pass_count_follows_bounds() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let mut engine = ExecutionEngine::new(
        run_config(2, 5, true),
        runner.clone(),
        CountingFetcher::default(),
        RecordingSink::default(),
        NoopProgress,
    );
    let outcome = engine
        .execute(&scenario(&[("p1", &["http://a/1", "http://a/2"])]))
        .await
        .map_err(|err| err.to_string())?;
    if outcome.passes.len() != 4 {
        return Err(format!("expected 4 passes, got {}", outcome.passes.len()));
    }
    let indexes: Vec<usize> = outcome.passes.iter().map(|pass| pass.index).collect();
    if indexes != [0, 1, 2, 3] || engine.state().pass_index() != 3 {
        return Err(format!("unexpected pass indexes {:?}", indexes));
    }
    if runner.calls().len() != 8 {
        return Err(format!("expected 8 invocations, got {}", runner.calls().len()));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn single_pass_uses_users_as_concurrency() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let sink = RecordingSink::default();
    let mut engine = ExecutionEngine::new(
        run_config(3, 3, false),
        runner.clone(),
        CountingFetcher::default(),
        sink.clone(),
        NoopProgress,
    );
    let outcome = engine
        .execute(&scenario(&[("p1", &["http://a/1", "http://a/2"])]))
        .await
        .map_err(|err| err.to_string())?;

    let calls = runner.calls();
    if calls.len() != 2
        || calls
            .iter()
            .any(|call| call.concurrency != 3 || call.max_requests != 3)
    {
        return Err(format!("unexpected invocations {:?}", calls));
    }
    if outcome.passes.len() != 1 || sink.handled() != [(3, true, 2)] {
        return Err(format!("unexpected passes {:?}", outcome.passes));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn entries_run_in_page_then_entry_order() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let mut engine = ExecutionEngine::new(
        run_config(1, 1, false),
        runner.clone(),
        CountingFetcher::default(),
        RecordingSink::default(),
        NoopProgress,
    );
    let outcome = engine
        .execute(&scenario(&[
            ("p1", &["http://a/1", "http://a/2"]),
            ("p2", &["http://a/3"]),
        ]))
        .await
        .map_err(|err| err.to_string())?;
    let invoked: Vec<String> = runner.calls().into_iter().map(|call| call.url).collect();
    let recorded: Vec<String> = outcome
        .passes
        .iter()
        .flat_map(|pass| pass.entries.iter().map(|entry| entry.url.clone()))
        .collect();
    let expected = ["http://a/1", "http://a/2", "http://a/3"];
    if invoked != expected || recorded != expected {
        return Err(format!("unexpected order {:?} / {:?}", invoked, recorded));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn wait_separates_consecutive_entries() -> Result<(), String> {
    let wait = Duration::from_millis(40);
    let runner = RecordingRunner::default();
    let mut config = run_config(1, 1, false);
    config.wait = wait;
    let mut engine = ExecutionEngine::new(
        config,
        runner.clone(),
        CountingFetcher::default(),
        RecordingSink::default(),
        NoopProgress,
    );
    let started = Instant::now();
    engine
        .execute(&scenario(&[("p1", &["http://a/1", "http://a/2"]), ("p2", &["http://a/3"])]))
        .await
        .map_err(|err| err.to_string())?;

    let calls = runner.calls();
    for pair in calls.windows(2) {
        if let [previous, next] = pair {
            let gap = next.started.duration_since(previous.finished);
            if gap < wait {
                return Err(format!("entries only {:?} apart", gap));
            }
        }
    }
    if started.elapsed() < wait.saturating_mul(3) {
        return Err("the wait after the final entry was skipped".to_owned());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn token_is_fetched_once_per_run() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let fetcher = CountingFetcher::default();
    let mut config = run_config(1, 2, true);
    config.token = Some(TokenConfig {
        header_name: "Authorization".to_owned(),
        url_substring: "/api/".to_owned(),
    });
    let mut engine = ExecutionEngine::new(
        config,
        runner.clone(),
        fetcher.clone(),
        RecordingSink::default(),
        NoopProgress,
    );
    engine
        .execute(&scenario(&[(
            "p1",
            &["http://a/static", "http://a/api/login", "http://a/api/items"],
        )]))
        .await
        .map_err(|err| err.to_string())?;

    if fetcher.calls.load(Ordering::Relaxed) != 1 || engine.state().token().fetches() != 1 {
        return Err("token must be fetched exactly once".to_owned());
    }
    for call in runner.calls() {
        let expected = if call.url.contains("/api/") {
            "Bearer fresh"
        } else {
            "Bearer recorded"
        };
        if call.authorization.as_deref() != Some(expected) {
            return Err(format!("unexpected header for {}: {:?}", call.url, call.authorization));
        }
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn token_failure_aborts_the_run() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let sink = RecordingSink::default();
    let mut config = run_config(1, 1, false);
    config.token = Some(TokenConfig {
        header_name: "Authorization".to_owned(),
        url_substring: "/api/".to_owned(),
    });
    let mut engine = ExecutionEngine::new(config, runner.clone(), FailingFetcher, sink.clone(), NoopProgress);
    match engine
        .execute(&scenario(&[("p1", &["http://a/api/login", "http://a/other"])]))
        .await
    {
        Err(AppError::Token(TokenError::Status { status: 500, .. })) => {}
        Err(err) => return Err(format!("unexpected error {}", err)),
        Ok(_) => return Err("expected token failure".to_owned()),
    }
    if !runner.calls().is_empty() || !sink.handled().is_empty() {
        return Err("nothing may run after a token failure".to_owned());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn runner_failures_are_recorded_and_the_pass_continues() -> Result<(), String> {
    let runner = RecordingRunner::default();
    let mut engine = ExecutionEngine::new(
        run_config(2, 2, false),
        runner.clone(),
        CountingFetcher::default(),
        RecordingSink::default(),
        NoopProgress,
    );
    let outcome = engine
        .execute(&scenario(&[("p1", &["http://a/fail", "http://a/ok"])]))
        .await
        .map_err(|err| err.to_string())?;
    let entries = outcome
        .passes
        .first()
        .map(|pass| pass.entries.clone())
        .unwrap_or_default();
    let [failed, ok] = entries.as_slice() else {
        return Err(format!("expected two entries, got {:?}", entries));
    };
    if failed.error.as_deref() != Some("boom") || failed.total_requests != 2 || failed.total_errors != 2 {
        return Err(format!("unexpected failure record {:?}", failed));
    }
    if ok.is_error() || ok.status_code != Some(200) {
        return Err(format!("unexpected success record {:?}", ok));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn report_failure_keeps_collected_passes() -> Result<(), String> {
    let sink = RecordingSink {
        fail: true,
        ..RecordingSink::default()
    };
    let mut engine = ExecutionEngine::new(
        run_config(1, 2, true),
        RecordingRunner::default(),
        CountingFetcher::default(),
        sink,
        NoopProgress,
    );
    match engine.execute(&scenario(&[("p1", &["http://a/1"])])).await {
        Err(AppError::Report(_)) => {}
        Err(err) => return Err(format!("unexpected error {}", err)),
        Ok(_) => return Err("expected report failure".to_owned()),
    }
    if engine.state().passes().len() != 2 {
        return Err(format!(
            "expected both passes to stay, got {}",
            engine.state().passes().len()
        ));
    }
    Ok(())
}

#[test]
fn progress_line_scales_to_goal() -> Result<(), String> {
    let style = ProgressStyle::new(10);
    let line = build_progress_line(&style, 1, 2, "GET http://a/", true);
    let text: String = line.iter().map(|segment| segment.text.as_str()).collect();
    if text != "[#####-----] 1/2 | GET http://a/" {
        return Err(format!("unexpected progress line {:?}", text));
    }
    Ok(())
}
