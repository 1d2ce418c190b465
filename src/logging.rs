//! Diagnostic logging to stderr. User-facing output stays on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "FOUNDRY_AGENT_LOG";

/// Filter directive: `FOUNDRY_AGENT_LOG` if set, else `debug` when verbose, else `warn`
pub fn filter_directive(verbose: bool) -> String {
    match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ if verbose => "foundry_agent=debug,warn".to_string(),
        _ => "warn".to_string(),
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
