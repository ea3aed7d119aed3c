//! Tracing setup for the `reticle-ci` binary.
//!
//! Call [`init_tracing`] once, before the harness configuration is resolved,
//! so environment failures (missing identity, bad harness directory) are
//! logged through the same subscriber as step execution.
//!
//! Log lines always go to stderr. Stdout is reserved for what the harness
//! itself prints: step listings, `show` output, run summaries and the full
//! simulator output surfaced on a content failure.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
fn default_filter(level: Level) -> EnvFilter {
    EnvFilter::new(level.as_str())
}

/// Install the global tracing subscriber.
///
/// * `json` - when `true`, each event is written as one JSON object per line
///   (for CI log collectors); otherwise the human-readable compact format.
/// * `level` - verbosity used when `RUST_LOG` does not say otherwise;
///   `--verbose` maps to `DEBUG`, which includes the resolved configuration.
///
/// `RUST_LOG` takes precedence over `level` and accepts the usual
/// per-target directives, e.g. `RUST_LOG=reticle_ci::runner=debug`.
///
/// The global subscriber can only be set once per process: later calls
/// (tests, or a library caller that already installed one) are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let (text, json_lines) = if json {
        (
            None,
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            ),
        )
    } else {
        (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        )
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json_lines)
        .try_init();
}
