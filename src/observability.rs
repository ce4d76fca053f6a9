//! Logging setup and per-run tracing context

use tracing::Span;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` is used as the filter.
pub fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Span wrapping one CLI invocation, tagged with a fresh time-ordered run ID
pub fn run_span(command: &'static str) -> Span {
    let run_id = Uuid::now_v7();
    tracing::info_span!("run", command, run_id = %run_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging("debug");
        init_logging("info");
    }

    #[test]
    fn test_run_span_builds() {
        let span = run_span("backup");
        let _guard = span.enter();
        tracing::info!("inside run span");
    }
}
