use std::fmt;

use crate::auth::TokenCache;
use crate::metrics::PassReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    RunningPage,
    RunningEntry,
    AwaitingToken,
    Invoking,
    Sleeping,
    PassComplete,
    Escalating,
    Finalizing,
    Done,
}

impl EngineState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::RunningPage => "running-page",
            EngineState::RunningEntry => "running-entry",
            EngineState::AwaitingToken => "awaiting-token",
            EngineState::Invoking => "invoking",
            EngineState::Sleeping => "sleeping",
            EngineState::PassComplete => "pass-complete",
            EngineState::Escalating => "escalating",
            EngineState::Finalizing => "finalizing",
            EngineState::Done => "done",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable bookkeeping of a run. Passes are only ever appended.
#[derive(Debug, Default)]
pub struct RunState {
    pub(super) pass_index: usize,
    pub(super) passes: Vec<PassReport>,
    pub(super) token: TokenCache,
}

impl RunState {
    #[must_use]
    pub const fn pass_index(&self) -> usize {
        self.pass_index
    }

    #[must_use]
    pub fn passes(&self) -> &[PassReport] {
        &self.passes
    }

    #[must_use]
    pub const fn token(&self) -> &TokenCache {
        &self.token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub passes: Vec<PassReport>,
    pub exit: RunExit,
}
