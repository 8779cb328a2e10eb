//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Install the global subscriber. Safe to call multiple times; only the first
/// call has any effect.
///
/// `RUST_LOG` takes precedence over `default_directive` (for instance the
/// configured `log-filter`).
pub fn init(default_directive: &str) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directive))
            .unwrap_or_else(|e| {
                eprintln!("Invalid log filter '{}': {}", default_directive, e);
                EnvFilter::new("info")
            });

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact();

        if is_test {
            if let Err(e) = builder.with_test_writer().finish().try_init() {
                eprintln!("Failed to initialize tracing: {}", e)
            }
        } else if let Err(e) = builder.with_writer(std::io::stderr).try_init() {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
