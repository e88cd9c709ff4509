use std::path::Path;

use tracing::debug;

use crate::error::{AppError, AppResult, ScenarioError};

use super::{Scenario, build_scenario};

/// Reads an archive from disk and builds its scenario.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not JSON, or does not
/// match the archive shape.
pub async fn load_archive(path: &Path) -> AppResult<Scenario> {
    let content = tokio::fs::read_to_string(path).await.map_err(|err| {
        AppError::scenario(ScenarioError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let archive: serde_json::Value = serde_json::from_str(&content).map_err(|err| {
        AppError::scenario(ScenarioError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let scenario = build_scenario(&archive)?;
    debug!(
        "Loaded scenario '{}': {} page(s), {} entr(y/ies)",
        path.display(),
        scenario.pages().len(),
        scenario.entry_count()
    );
    Ok(scenario)
}
