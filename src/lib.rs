//! Process-wide logging facility with live-updatable level specs.
//!
//! # Architecture Overview
//!
//! ```text
//!   app code ──▶ Logger ("peer.gossip") ──▶ Shared::check ──▶ LevelSpec (ArcSwap)
//!                                              │
//!                                    enabled?  ▼
//!                               Observer ◀── Shared::write ──▶ Encoder ──▶ LogWriter
//!                                                                          (console,
//!   admin API / SIGHUP / watcher ──▶ Logging::activate_spec / apply         rotating file,
//!                                        (atomic swap, no handle rebuilt)  tee)
//! ```
//!
//! ```
//! use logspec::{Logging, Severity};
//!
//! let logging = Logging::new();
//! logging.activate_spec("warn:peer=debug:peer.gossip.=error").unwrap();
//!
//! let gossip = logging.logger("peer.gossip");
//! assert_eq!(logging.level("peer.gossip"), Severity::Error);
//! assert_eq!(logging.level("peer.gossip.state"), Severity::Debug);
//! assert!(!gossip.is_enabled_for(Severity::Warn));
//! ```

// Core
pub mod facility;
pub mod level;
pub mod logger;
pub mod sink;

// Process-wide default and macros
pub mod global;
mod macros;

// Cross-cutting concerns
pub mod admin;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::LoggingConfig;
pub use facility::{LoggerLevel, Logging, LoggingError};
pub use global::{
    activate_spec, global, init, logger_level, must_get_file_logger, must_get_logger, reset,
    set_global_log_level, set_observer, set_writer,
};
pub use level::{LevelSpec, NameError, Severity, SpecError};
pub use logger::{Encoder, Field, Logger, LoggerOption};
pub use observability::{Observer, SharedObserver};
pub use sink::{LogWriter, SharedWriter};
