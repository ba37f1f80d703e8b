//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, level spec included)
//!     → ServiceConfig (validated, immutable)
//!     → Logging::apply(&config.logging)
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → Logging::apply swaps spec, writer and encoder atomically
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; an empty file is a valid config
//! - A rejected reload keeps the running configuration
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AdminConfig, LogFormat, LoggingConfig, MetricsConfig, ServiceConfig, WriterTarget};
pub use validation::ValidationError;
