//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every log call:
//!     → observer.rs (check, then write_entry for written entries)
//!     → metrics.rs  (per-severity counters behind the observer)
//!
//! The crate's own diagnostics and other libraries' events:
//!     tracing event → tracing.rs (bridge layer) → named logger
//!     logging.rs installs the subscriber for the daemon
//! ```
//!
//! # Design Decisions
//! - The observer is optional; an empty slot costs one atomic load
//! - Metrics are cheap (one counter increment per hook)
//! - Sink diagnostics are never bridged back into the facility

pub mod logging;
pub mod metrics;
pub mod observer;
pub mod tracing;

pub use self::metrics::{MetricsObserver, MetricsProvider};
pub use self::observer::{Observer, SharedObserver};
pub use self::tracing::TracingBridge;
