use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::config::OutputTarget;
use crate::error::ReportError;
use crate::metrics::PassReport;

use super::format::strip_ansi;

/// Writes the rendered report to stdout, or to the target file with escape
/// sequences removed. A `.json` file receives the passes as JSON instead.
///
/// # Errors
///
/// Returns a `ReportError` when stdout or the file cannot be written.
pub async fn export_report(
    content: &str,
    passes: &[PassReport],
    target: &OutputTarget,
) -> Result<(), ReportError> {
    match target {
        OutputTarget::Terminal => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| ReportError::Stdout { source })
        }
        OutputTarget::File(path) => {
            let payload = if target.is_json() {
                json_payload(passes)?
            } else {
                strip_ansi(content).into_bytes()
            };
            write_file(path, &payload).await?;
            info!("Report saved to {}", path.display());
            Ok(())
        }
    }
}

fn json_payload(passes: &[PassReport]) -> Result<Vec<u8>, ReportError> {
    let payload = serde_json::json!({
        "generator": concat!("harstress/", env!("CARGO_PKG_VERSION")),
        "passes": passes,
    });
    serde_json::to_vec_pretty(&payload).map_err(|source| ReportError::Serialize { source })
}

async fn write_file(path: &Path, payload: &[u8]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = tokio::fs::File::create(path).await.map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(payload).await.map_err(write_err)?;
    writer.flush().await.map_err(write_err)?;
    Ok(())
}
