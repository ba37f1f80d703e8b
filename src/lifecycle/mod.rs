//! Lifecycle management for the daemon.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Apply to facility → Install bridge/metrics
//!     → Start watcher → Serve admin API
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the admin server
//!     SIGHUP → reload config from disk
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A failed reload keeps the running configuration

pub mod signals;

pub use signals::{shutdown_signal, ReloadSignal};
