//! The scenario execution engine.
//!
//! One pass walks every page and entry in archive order, handing each entry
//! to the load runner and sleeping `wait` afterwards. In progressive mode the
//! engine adds one user after each pass until the user limit is reached.
mod executor;
mod progress;
mod state;

#[cfg(test)]
mod tests;

pub use executor::ExecutionEngine;
pub use progress::{ConsoleProgress, NoopProgress, ProgressSink};
pub use state::{EngineState, RunExit, RunOutcome, RunState};
