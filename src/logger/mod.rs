//! Named loggers.
//!
//! # Data Flow
//! ```text
//! Logging::logger("peer.gossip")
//!     → registry.rs (validate once, intern the name)
//!     → handle.rs   (Logger: name + shared facility state)
//!
//! On every call:
//!     level check → format → encoder.rs (Entry → bytes) → writer
//! ```
//!
//! # Design Decisions
//! - Handles are cheap clones and never cache the level
//! - Derived handles (`named`, `with`, `with_options`) never mutate the source
//! - Three explicit call shapes per severity: positional, templated, structured

pub mod encoder;
pub mod field;
pub mod handle;
pub mod registry;

pub use encoder::{Encoder, Entry};
pub use field::Field;
pub use handle::{Logger, LoggerOption};
pub use registry::Registry;
