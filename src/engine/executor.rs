use tracing::{debug, info, trace, warn};

use crate::auth::TokenFetcher;
use crate::config::RunConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::{EntryMetrics, PassReport};
use crate::report::ReportSink;
use crate::runner::{LoadRequest, LoadRunner};
use crate::scenario::{Entry, Page, Scenario};

use super::progress::ProgressSink;
use super::state::{EngineState, RunExit, RunOutcome, RunState};

/// Drives passes over a scenario. Owns the run configuration, so `users` is
/// only ever changed here, between two passes.
pub struct ExecutionEngine<R, F, S, P> {
    config: RunConfig,
    runner: R,
    fetcher: F,
    sink: S,
    progress: P,
    state: RunState,
    phase: EngineState,
}

impl<R, F, S, P> ExecutionEngine<R, F, S, P>
where
    R: LoadRunner,
    F: TokenFetcher,
    S: ReportSink,
    P: ProgressSink,
{
    pub fn new(config: RunConfig, runner: R, fetcher: F, sink: S, progress: P) -> Self {
        Self {
            config,
            runner,
            fetcher,
            sink,
            progress,
            state: RunState::default(),
            phase: EngineState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> EngineState {
        self.phase
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every pass and hands each one to the report sink.
    ///
    /// # Errors
    ///
    /// A token failure aborts the run. A report failure is returned once the
    /// pass has been stored, so `state()` still holds every collected pass.
    /// Load runner failures never abort; they are recorded per entry.
    pub async fn execute(&mut self, scenario: &Scenario) -> AppResult<RunOutcome> {
        info!(
            "Starting run: {} page(s), {} entr(y/ies), {} pass(es) planned",
            scenario.pages().len(),
            scenario.entry_count(),
            self.config.planned_passes()
        );
        loop {
            let mut pass = PassReport::new(self.state.pass_index, self.config.users);
            for page in scenario.pages() {
                self.transition(EngineState::RunningPage);
                debug!("Processing page [{}] - [{}]", page.id, page.title);
                for entry in &page.entries {
                    let metrics = self.run_entry(page, entry).await?;
                    pass.entries.push(metrics);

                    self.transition(EngineState::Sleeping);
                    trace!("Sleeping {} ms before next entry", self.config.wait.as_millis());
                    tokio::time::sleep(self.config.wait).await;
                }
            }

            self.transition(EngineState::PassComplete);
            let escalate = self.config.progressive && self.config.users < self.config.user_limit;
            pass.last = !escalate;
            info!(
                "{} finished ({} entr(y/ies))",
                pass.title,
                pass.entries.len()
            );
            self.progress.pass_finished(&pass);
            self.state.passes.push(pass);

            if let Some(stored) = self.state.passes.last() {
                self.sink
                    .handle_pass(stored, stored.last, &self.config.output)
                    .await
                    .map_err(AppError::from)?;
            }

            if escalate {
                self.transition(EngineState::Escalating);
                self.config.users = self.config.users.saturating_add(1);
                self.state.pass_index = self.state.pass_index.saturating_add(1);
            } else {
                self.transition(EngineState::Finalizing);
                break;
            }
        }

        self.transition(EngineState::Done);
        Ok(RunOutcome {
            passes: self.state.passes.clone(),
            exit: RunExit::Completed,
        })
    }

    async fn run_entry(&mut self, page: &Page, entry: &Entry) -> AppResult<EntryMetrics> {
        self.transition(EngineState::RunningEntry);
        let users = self.config.users;
        self.progress.entry_started(page, entry, users);
        debug!("Load for [{}] - [{}] started", page.id, entry.url);

        let mut request = LoadRequest::from(entry);
        self.transition(EngineState::AwaitingToken);
        self.state
            .token
            .ensure_token(&mut request, self.config.token.as_ref(), &self.fetcher)
            .await
            .map_err(AppError::from)?;

        self.transition(EngineState::Invoking);
        let params = self.config.load_params();
        let metrics = self
            .runner
            .run(&request, &params)
            .await
            .unwrap_or_else(|failure| {
                warn!("Load for [{}] failed: {}", entry.url, failure.message);
                EntryMetrics::from_failure(&entry.url, failure.partial, failure.message)
            });
        debug!("Load for [{}] - [{}] ended", page.id, entry.url);
        self.progress.entry_finished(&entry.url, &metrics);
        Ok(metrics)
    }

    fn transition(&mut self, next: EngineState) {
        trace!("Engine state {} -> {}", self.phase, next);
        self.phase = next;
    }
}
