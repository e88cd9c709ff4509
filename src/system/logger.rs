use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV_VARS: [&str; 2] = ["HARSTRESS_LOG", "RUST_LOG"];
const DEFAULT_DIRECTIVE: &str = "info";
// hyper and reqwest are chatty at debug; verbose only raises this crate.
const VERBOSE_DIRECTIVE: &str = "info,harstress=debug";

/// Installs the global subscriber writing to stderr. `HARSTRESS_LOG` wins
/// over `RUST_LOG`; an unparsable directive falls back to the defaults.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = LOG_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(resolve_filter(directive.as_deref(), verbose))
        .with_ansi(!no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn resolve_filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    directive
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}
