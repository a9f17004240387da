//! Global tracing subscriber setup.

use std::sync::Once;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::formatter::FrameFormatter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,jungle_ops=info";

static INIT: Once = Once::new();

/// Installs the global subscriber. Only the first call has any effect.
///
/// `debug` raises this crate's level to `debug` when `RUST_LOG` is not set.
pub fn setup_logging(debug: bool) {
    INIT.call_once(|| {
        let fallback = if debug { "warn,jungle_ops=debug" } else { DEFAULT_FILTER };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).event_format(FrameFormatter))
            .with(filter)
            .with(ErrorLayer::default());

        if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to install tracing subscriber: {error}");
        }
    });
}
