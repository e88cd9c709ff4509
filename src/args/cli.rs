use std::path::PathBuf;

use clap::Parser;

use super::defaults::{DEFAULT_WAIT_MS, default_timeout, default_users};
use super::parsers::{parse_non_empty, parse_positive_u64};
use super::types::PositiveU64;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replays a recorded HAR session as a sequential HTTP load test, optionally ramping simultaneous users pass after pass."
)]
pub struct RunArgs {
    /// Path to the HAR archive to replay
    #[arg(long, short = 's')]
    pub scenario: Option<PathBuf>,

    /// Log every page and entry as it runs
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Simultaneous users per entry
    #[arg(long, short = 'u', default_value_t = default_users(), value_parser = parse_positive_u64)]
    pub users: PositiveU64,

    /// Repeat the scenario, adding one user per pass until the user limit
    #[arg(long, short = 'p')]
    pub progressive: bool,

    /// Highest user count reached in progressive mode (defaults to --users)
    #[arg(long = "user-limit", short = 'l', value_parser = parse_positive_u64)]
    pub user_limit: Option<PositiveU64>,

    /// Delay between two entries, in milliseconds
    #[arg(long, short = 'w', default_value_t = DEFAULT_WAIT_MS)]
    pub wait: u64,

    /// Per-request timeout, in milliseconds
    #[arg(long, short = 't', default_value_t = default_timeout(), value_parser = parse_positive_u64)]
    pub timeout: PositiveU64,

    /// Requests per second cap for each entry
    #[arg(long = "rps", short = 'r', value_parser = parse_positive_u64)]
    pub rps: Option<PositiveU64>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Report destination: terminal, auto (generated file) or a file path
    #[arg(long, short = 'o', default_value = "terminal", value_parser = parse_non_empty)]
    pub output: String,

    /// Header overwritten with the fetched token
    #[arg(long = "token-header")]
    pub token_header: Option<String>,

    /// Url substring selecting the entries that carry the token
    #[arg(long = "token-url")]
    pub token_url: Option<String>,

    /// Start without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to config file (TOML or JSON)
    #[arg(long, short = 'c')]
    pub config: Option<String>,
}
