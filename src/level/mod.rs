//! Level specification engine.
//!
//! # Data Flow
//! ```text
//! spec string ("warn:peer=debug:peer.gossip.=error")
//!     → spec.rs (parse & validate, all or nothing)
//!     → LevelSpec (immutable)
//!     → published by the facility via atomic swap
//!
//! On every log call:
//!     LevelSpec::level(name) → Severity threshold
//! ```
//!
//! # Design Decisions
//! - A spec is never mutated; reconfiguration builds a new one
//! - Resolution is pure and lock-free
//! - Exact rule, then longest dotted prefix, then default

pub mod name;
pub mod severity;
pub mod spec;

pub use name::{is_valid_logger_name, validate_logger_name, NameError};
pub use severity::{Severity, UnknownSeverity};
pub use spec::{LevelSpec, Pattern, Rule, SpecError};
