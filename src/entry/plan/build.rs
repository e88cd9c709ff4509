use chrono::Local;
use clap::ArgMatches;

use crate::args::RunArgs;
use crate::config::{RunConfig, apply_config, load_config};
use crate::error::AppResult;
use crate::system::logger::init_logging;

use super::types::RunPlan;

pub(crate) fn build_plan(mut args: RunArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    let config = RunConfig::from_args(&args, Local::now())?;
    Ok(RunPlan {
        config,
        yes: args.yes,
        no_color: args.no_color,
    })
}
