use std::path::PathBuf;

use serde::Deserialize;

/// Values accepted in `harstress.toml` / `harstress.json`. Every field is
/// optional; explicit CLI values take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub scenario: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub users: Option<u64>,
    pub progressive: Option<bool>,
    pub user_limit: Option<u64>,
    pub wait: Option<u64>,
    pub timeout: Option<u64>,
    pub rps: Option<u64>,
    pub insecure: Option<bool>,
    pub output: Option<String>,
    pub no_color: Option<bool>,
    pub token: Option<TokenSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenSection {
    pub header: Option<String>,
    pub url: Option<String>,
}
