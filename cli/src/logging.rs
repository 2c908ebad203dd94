//! Logging configuration
//!
//! Stderr only; stdout carries command output. `RUST_LOG` wins when set;
//! otherwise INFO+, or DEBUG+ for bulwark crates when `DEBUG_LOGGING` is set.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,bulwark=debug,bulwark_cli=debug,bulwark_core=debug";

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug_logging)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    // A second init (tests, embedding) keeps the existing subscriber
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();

    tracing::debug!(debug_logging, "Bulwark logging initialized");
}

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging { DEBUG_DIRECTIVE } else { "info" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_directive_parses() {
        assert!(EnvFilter::try_new(filter_directive(true)).is_ok());
        assert_eq!(filter_directive(false), "info");
    }
}
