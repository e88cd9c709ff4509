use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Missing scenario (set --scenario or provide it in config).")]
    MissingScenario,
    #[error("Simultaneous users ({users}) must not exceed the user limit ({limit}).")]
    UsersAboveLimit { users: u64, limit: u64 },
    #[error("Token injection requires both --token-header and --token-url.")]
    TokenConfigIncomplete,
    #[error("Token header name must not be empty.")]
    TokenHeaderEmpty,
    #[error("Token url substring must not be empty.")]
    TokenUrlEmpty,
    #[error("Output path must not be empty.")]
    OutputEmpty,
    #[error("Failed to read confirmation answer: {source}")]
    ConfirmationRead {
        #[source]
        source: std::io::Error,
    },
}
