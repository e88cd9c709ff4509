use std::path::PathBuf;

use super::types::PositiveU64;

pub(crate) const DEFAULT_USERS: u64 = 1;
pub(crate) const DEFAULT_WAIT_MS: u64 = 2000;
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Directory receiving generated (`--output auto`) reports.
pub(crate) fn default_report_dir() -> PathBuf {
    std::env::temp_dir()
}

pub(crate) fn default_users() -> PositiveU64 {
    PositiveU64::try_from(DEFAULT_USERS).unwrap_or(PositiveU64::ONE)
}

pub(crate) fn default_timeout() -> PositiveU64 {
    PositiveU64::try_from(DEFAULT_TIMEOUT_MS).unwrap_or(PositiveU64::ONE)
}
