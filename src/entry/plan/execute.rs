use std::io::IsTerminal;

use tracing::{info, warn};

use crate::auth::ReqwestTokenFetcher;
use crate::engine::{ConsoleProgress, ExecutionEngine, RunOutcome};
use crate::error::AppResult;
use crate::report::ReportAggregator;
use crate::runner::HttpLoadRunner;
use crate::scenario::load_archive;
use crate::system::{banner, confirm};

use super::types::RunPlan;

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let RunPlan {
        config,
        yes,
        no_color,
    } = plan;
    let colored = !no_color && std::io::stdout().is_terminal();

    banner::print_cli_banner(no_color);
    println!();

    let scenario = load_archive(&config.scenario).await?;

    println!("{}", confirm::summary_table(&config, colored)?);
    if !confirm::confirm_start(yes)? {
        info!("Load process cancelled");
        return Ok(());
    }

    let fetcher = ReqwestTokenFetcher::new(config.timeout, config.insecure)?;
    let progress = ConsoleProgress::new(scenario.entry_count(), no_color);
    let mut engine = ExecutionEngine::new(
        config,
        HttpLoadRunner::new(),
        fetcher,
        ReportAggregator::new(colored),
        progress,
    );
    let outcome = engine.execute(&scenario).await?;
    log_failed_entries(&outcome);
    Ok(())
}

fn log_failed_entries(outcome: &RunOutcome) {
    let failed = outcome
        .passes
        .iter()
        .flat_map(|pass| pass.entries.iter())
        .filter(|entry| entry.is_error())
        .count();
    if failed > 0 {
        warn!("{} entr(y/ies) failed during the run; see the report", failed);
    }
}
