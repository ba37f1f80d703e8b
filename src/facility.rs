//! The logging facility.
//!
//! # Responsibilities
//! - Own the current level spec, the writer slot, the observer slot and the
//!   encoder, each published through an atomic pointer swap
//! - Hand out named logger handles backed by the registry
//! - Apply a `LoggingConfig` all or nothing
//!
//! # Data Flow
//! ```text
//! Logger::info(..)
//!     → Shared::check   (one spec load, observer.check)
//!     → disabled? return before formatting
//!     → Shared::write   (observer.write_entry, encode, writer.write)
//!
//! activate_spec / apply / set_writer / set_observer
//!     → build the new value off to the side
//!     → ArcSwap::store / swap
//! ```
//!
//! # Design Decisions
//! - Readers never block; writers publish whole immutable values
//! - Handles hold the shared state, the registry holds only names
//! - Sink failures never reach the caller; they are reported on `tracing`

use arc_swap::{ArcSwap, ArcSwapOption};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::config::schema::{LoggingConfig, WriterTarget};
use crate::config::validation::{validate_logging, ValidationError};
use crate::level::{validate_logger_name, LevelSpec, NameError, Severity, SpecError};
use crate::logger::{Encoder, Entry, Field, Logger, Registry};
use crate::observability::observer::SharedObserver;
use crate::sink::{ConsoleWriter, RotatingFileWriter, SharedWriter, TeeWriter};

/// `tracing` target for sink diagnostics.
pub const SINK_TARGET: &str = "logspec::sink";

/// Errors returned by [`Logging::apply`].
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("invalid logging config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("failed to open log file {path}: {source}")]
    Writer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A registered logger and its effective level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerLevel {
    pub name: String,
    pub level: Severity,
}

/// State shared by the facility and every handle it created.
pub(crate) struct Shared {
    spec: ArcSwap<LevelSpec>,
    writer: ArcSwap<SharedWriter>,
    observer: ArcSwapOption<SharedObserver>,
    encoder: ArcSwap<Encoder>,
    registry: Registry,
    seq: AtomicU64,
}

impl Shared {
    pub(crate) fn level(&self, name: &str) -> Severity {
        self.spec.load().level(name)
    }

    pub(crate) fn intern(&self, name: &str) -> Result<Arc<str>, NameError> {
        validate_logger_name(name)?;
        Ok(self.registry.get_or_create(name))
    }

    /// Level check for one call. Notifies the observer whatever the outcome.
    pub(crate) fn check(&self, name: &str, severity: Severity, floor: Option<Severity>) -> bool {
        if let Some(observer) = &*self.observer.load() {
            observer.check(severity, name);
        }

        let level = self.spec.load().level(name);
        let threshold = floor.map_or(level, |floor| level.max(floor));
        severity >= threshold
    }

    pub(crate) fn write(
        &self,
        name: &str,
        severity: Severity,
        message: &str,
        context: &[Field],
        fields: &[Field],
    ) {
        if let Some(observer) = &*self.observer.load() {
            observer.write_entry(severity, name);
        }

        let entry = Entry {
            time: chrono::Local::now(),
            severity,
            logger: name,
            seq: self.seq.fetch_add(1, Ordering::Relaxed) + 1,
            message,
            context,
            fields,
        };
        let record = self.encoder.load().encode(&entry);

        if let Err(e) = self.writer.load().write(&record) {
            tracing::warn!(
                target: SINK_TARGET,
                logger = name,
                error = %e,
                "Failed to write log record"
            );
        }
    }

    pub(crate) fn sync(&self) -> io::Result<()> {
        self.writer.load().flush()
    }
}

/// A logging facility: level spec, registry, writer and observer.
///
/// Cloning is cheap; all clones share the same state.
#[derive(Clone)]
pub struct Logging {
    shared: Arc<Shared>,
}

impl Logging {
    /// A facility with the defaults: `info`, no rules, text on stderr.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                spec: ArcSwap::from_pointee(LevelSpec::default()),
                writer: ArcSwap::from_pointee(Arc::new(ConsoleWriter::stderr()) as SharedWriter),
                observer: ArcSwapOption::empty(),
                encoder: ArcSwap::from_pointee(Encoder::default()),
                registry: Registry::new(),
                seq: AtomicU64::new(0),
            }),
        }
    }

    /// A facility configured from `config`.
    pub fn with_config(config: &LoggingConfig) -> Result<Self, LoggingError> {
        let logging = Self::new();
        logging.apply(config)?;
        Ok(logging)
    }

    /// The logger named `name`.
    ///
    /// # Panics
    /// When `name` is not a valid logger name.
    pub fn logger(&self, name: &str) -> Logger {
        match self.try_logger(name) {
            Ok(logger) => logger,
            Err(e) => panic!("{e}"),
        }
    }

    /// The logger named `name`, or an error for invalid names.
    pub fn try_logger(&self, name: &str) -> Result<Logger, NameError> {
        let name = self.shared.intern(name)?;
        Ok(Logger::new(name, Arc::clone(&self.shared)))
    }

    /// Effective level for `name` under the current spec.
    pub fn level(&self, name: &str) -> Severity {
        self.shared.level(name)
    }

    pub fn is_enabled(&self, name: &str, severity: Severity) -> bool {
        self.shared.spec.load().is_enabled(name, severity)
    }

    /// Parse `spec` and install it. On error the current spec is unchanged.
    pub fn activate_spec(&self, spec: &str) -> Result<(), SpecError> {
        let parsed = LevelSpec::parse(spec)?;
        tracing::debug!(spec = %parsed, "Activating level spec");
        self.shared.spec.store(Arc::new(parsed));
        Ok(())
    }

    /// Reconfigure the spec, writer and encoder. On error nothing changes.
    pub fn apply(&self, config: &LoggingConfig) -> Result<(), LoggingError> {
        validate_logging(config).map_err(LoggingError::Invalid)?;
        let spec = LevelSpec::parse(&config.level_spec)?;
        let writer = build_writer(config)?;
        let encoder = config.encoder();

        tracing::debug!(
            spec = %spec,
            writer_target = ?config.writer_target,
            encoder = ?encoder,
            "Applying logging config"
        );

        self.shared.spec.store(Arc::new(spec));
        self.shared.writer.store(Arc::new(writer));
        self.shared.encoder.store(Arc::new(encoder));
        Ok(())
    }

    /// Install `writer`, returning the previous one.
    pub fn set_writer(&self, writer: SharedWriter) -> SharedWriter {
        let previous = self.shared.writer.swap(Arc::new(writer));
        Arc::clone(&*previous)
    }

    pub fn writer(&self) -> SharedWriter {
        let current = self.shared.writer.load();
        Arc::clone(&**current)
    }

    /// Install `observer` (or none), returning the previous one.
    pub fn set_observer(&self, observer: Option<SharedObserver>) -> Option<SharedObserver> {
        self.shared
            .observer
            .swap(observer.map(Arc::new))
            .map(|previous| Arc::clone(&*previous))
    }

    pub fn observer(&self) -> Option<SharedObserver> {
        self.shared
            .observer
            .load_full()
            .map(|observer| Arc::clone(&*observer))
    }

    /// Install `encoder`, returning the previous one.
    pub fn set_encoder(&self, encoder: Encoder) -> Encoder {
        *self.shared.encoder.swap(Arc::new(encoder))
    }

    pub fn encoder(&self) -> Encoder {
        **self.shared.encoder.load()
    }

    /// The current spec in normalized form.
    pub fn spec(&self) -> String {
        self.shared.spec.load().to_string()
    }

    /// A snapshot of the current spec. Later activations do not affect it.
    pub fn levels(&self) -> Arc<LevelSpec> {
        self.shared.spec.load_full()
    }

    /// Registered loggers with their effective levels, sorted by name.
    pub fn loggers(&self) -> Vec<LoggerLevel> {
        let spec = self.shared.spec.load();
        self.shared
            .registry
            .names()
            .into_iter()
            .map(|name| LoggerLevel {
                level: spec.level(&name),
                name,
            })
            .collect()
    }

    /// Flush the current writer.
    pub fn sync(&self) -> io::Result<()> {
        self.shared.sync()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logging")
            .field("spec", &self.spec())
            .field("encoder", &self.encoder())
            .field("loggers", &self.shared.registry.len())
            .finish_non_exhaustive()
    }
}

fn build_writer(config: &LoggingConfig) -> Result<SharedWriter, LoggingError> {
    let console = || Arc::new(ConsoleWriter::stderr()) as SharedWriter;
    let file = || {
        RotatingFileWriter::new(config.rotation())
            .map(|writer| Arc::new(writer) as SharedWriter)
            .map_err(|source| LoggingError::Writer {
                path: config.file_path.clone(),
                source,
            })
    };

    Ok(match config.writer_target {
        WriterTarget::Console => console(),
        WriterTarget::File => file()?,
        WriterTarget::Both => Arc::new(TeeWriter::new(vec![console(), file()?])),
    })
}
