use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scenario '{path}' is not a JSON/HAR file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid archive at '{path}': {reason}")]
    Schema { path: String, reason: String },
    #[error("Cannot process this scenario. No page or entry could be resolved.")]
    Empty,
}

impl ScenarioError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ScenarioError::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
