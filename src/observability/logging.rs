//! Subscriber setup for binaries.
//!
//! The daemon routes its own `tracing` output, and that of its libraries,
//! through the facility so a single level spec governs everything.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::facility::Logging;
use crate::observability::tracing::TracingBridge;

/// Default `tracing` filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Install a global subscriber that forwards events to `logging`.
///
/// `RUST_LOG` pre-filters events before they reach the facility's own spec.
pub fn init_tracing(logging: &Logging) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(TracingBridge::new(logging.clone()))
        .try_init()
}
