use super::types::PositiveU64;
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_non_empty(s: &str) -> AppResult<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(ValidationError::OutputEmpty));
    }
    Ok(trimmed.to_owned())
}
