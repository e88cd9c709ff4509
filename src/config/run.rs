use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::args::{RunArgs, default_report_dir};
use crate::auth::TokenConfig;
use crate::error::{AppError, AppResult, ValidationError};
use crate::runner::LoadParams;

const TERMINAL_OUTPUT: &str = "terminal";
const AUTO_OUTPUT: &str = "auto";

/// Where the final report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Terminal,
    File(PathBuf),
}

impl OutputTarget {
    /// `terminal`, `auto` (a timestamped file named after the scenario in the
    /// system temp directory) or a literal path.
    #[must_use]
    pub fn resolve(raw: &str, scenario: &Path, now: DateTime<Local>) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(TERMINAL_OUTPUT) {
            return Self::Terminal;
        }
        if raw.eq_ignore_ascii_case(AUTO_OUTPUT) {
            let stem = scenario
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.is_empty())
                .unwrap_or_else(|| "scenario".to_owned());
            let file_name = format!("{}-{}.report", stem, now.format("%Y%m%d-%H%M%S"));
            return Self::File(default_report_dir().join(file_name));
        }
        Self::File(PathBuf::from(raw))
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        match self {
            Self::Terminal => false,
            Self::File(path) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json")),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal => f.write_str(TERMINAL_OUTPUT),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The resolved settings of one run. `users` is the concurrency of the pass
/// about to start; the engine raises it between passes in progressive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub scenario: PathBuf,
    pub users: u64,
    pub user_limit: u64,
    pub wait: Duration,
    pub timeout: Duration,
    pub requests_per_second: Option<u64>,
    pub progressive: bool,
    pub insecure: bool,
    pub verbose: bool,
    pub output: OutputTarget,
    pub token: Option<TokenConfig>,
}

impl RunConfig {
    /// Resolves parsed arguments into a run configuration.
    ///
    /// Progressive mode without `--user-limit` starts at one user and climbs to
    /// `--users`; with it, it starts at `--users` and climbs to the limit.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing scenario, a user count above
    /// the limit, or an incomplete token configuration.
    pub fn from_args(args: &RunArgs, now: DateTime<Local>) -> AppResult<Self> {
        let scenario = args
            .scenario
            .clone()
            .ok_or_else(|| AppError::validation(ValidationError::MissingScenario))?;

        let (users, user_limit) = match (args.progressive, args.user_limit) {
            (false, _) => (args.users.get(), args.users.get()),
            (true, None) => (1, args.users.get()),
            (true, Some(limit)) => {
                if args.users > limit {
                    return Err(AppError::validation(ValidationError::UsersAboveLimit {
                        users: args.users.get(),
                        limit: limit.get(),
                    }));
                }
                (args.users.get(), limit.get())
            }
        };

        let output = OutputTarget::resolve(&args.output, &scenario, now);
        let token = resolve_token(args.token_header.as_deref(), args.token_url.as_deref())?;

        Ok(Self {
            scenario,
            users,
            user_limit,
            wait: Duration::from_millis(args.wait),
            timeout: Duration::from_millis(args.timeout.get()),
            requests_per_second: args.rps.map(u64::from),
            progressive: args.progressive,
            insecure: args.insecure,
            verbose: args.verbose,
            output,
            token,
        })
    }

    #[must_use]
    pub const fn load_params(&self) -> LoadParams {
        LoadParams {
            concurrency: self.users,
            max_requests: self.users,
            timeout: self.timeout,
            requests_per_second: self.requests_per_second,
            insecure: self.insecure,
        }
    }

    /// Number of passes this configuration produces.
    #[must_use]
    pub const fn planned_passes(&self) -> u64 {
        if self.progressive {
            self.user_limit.saturating_sub(self.users).saturating_add(1)
        } else {
            1
        }
    }
}

fn resolve_token(header: Option<&str>, url: Option<&str>) -> AppResult<Option<TokenConfig>> {
    match (header, url) {
        (None, None) => Ok(None),
        (Some(header), Some(url)) => {
            let header = header.trim();
            if header.is_empty() {
                return Err(AppError::validation(ValidationError::TokenHeaderEmpty));
            }
            if url.is_empty() {
                return Err(AppError::validation(ValidationError::TokenUrlEmpty));
            }
            Ok(Some(TokenConfig {
                header_name: header.to_owned(),
                url_substring: url.to_owned(),
            }))
        }
        (Some(_), None) | (None, Some(_)) => {
            Err(AppError::validation(ValidationError::TokenConfigIncomplete))
        }
    }
}
