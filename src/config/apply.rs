use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, RunArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments that were not given on the
/// command line.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "scenario")
        && let Some(scenario) = config.scenario.clone()
    {
        args.scenario = Some(scenario);
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = ensure_positive_u64(users, "users")?;
    }

    if !is_cli(matches, "progressive")
        && let Some(progressive) = config.progressive
    {
        args.progressive = progressive;
    }

    if !is_cli(matches, "user_limit")
        && let Some(limit) = config.user_limit
    {
        args.user_limit = Some(ensure_positive_u64(limit, "user_limit")?);
    }

    if !is_cli(matches, "wait")
        && let Some(wait) = config.wait
    {
        args.wait = wait;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout
    {
        args.timeout = ensure_positive_u64(timeout, "timeout")?;
    }

    if !is_cli(matches, "rps")
        && let Some(rps) = config.rps
    {
        args.rps = Some(ensure_positive_u64(rps, "rps")?);
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.as_deref()
    {
        let output = output.trim();
        if output.is_empty() {
            return Err(AppError::validation(ValidationError::OutputEmpty));
        }
        output.clone_into(&mut args.output);
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if let Some(token) = config.token.as_ref() {
        if !is_cli(matches, "token_header")
            && let Some(header) = token.header.clone()
        {
            args.token_header = Some(header);
        }
        if !is_cli(matches, "token_url")
            && let Some(url) = token.url.clone()
        {
            args.token_url = Some(url);
        }
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
