//! Named logger handles.
//!
//! A `Logger` is cheap to clone and never caches a level: every call reads
//! the facility's current spec, so an activation is visible to all existing
//! handles immediately.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::facility::Shared;
use crate::level::Severity;
use crate::logger::field::Field;

/// Options accepted by [`Logger::with_options`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoggerOption {
    /// Extra context fields.
    Fields(Vec<Field>),
    /// Per-handle floor; can only raise the effective threshold.
    IncreaseLevel(Severity),
    /// In development mode `dpanic` entries panic.
    Development(bool),
}

/// A handle to a named logger.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    shared: Arc<Shared>,
    fields: Arc<[Field]>,
    floor: Option<Severity>,
    development: bool,
}

macro_rules! leveled {
    ($($severity:ident => $plain:ident, $templated:ident, $structured:ident;)*) => {
        $(
            #[doc = concat!("Log at `", stringify!($severity), "`; values are joined by a single space.")]
            pub fn $plain(&self, args: &[&dyn fmt::Display]) {
                self.emit(Severity::$severity, &[], || join_args(args));
            }

            #[doc = concat!("Log a formatted message at `", stringify!($severity), "`.")]
            pub fn $templated(&self, args: fmt::Arguments<'_>) {
                self.emit(Severity::$severity, &[], || args.to_string());
            }

            #[doc = concat!("Log a message with structured fields at `", stringify!($severity), "`.")]
            pub fn $structured(&self, msg: &str, fields: &[Field]) {
                self.emit(Severity::$severity, fields, || msg.to_string());
            }
        )*
    };
}

impl Logger {
    pub(crate) fn new(name: Arc<str>, shared: Arc<Shared>) -> Self {
        Self {
            name,
            shared,
            fields: Arc::from(Vec::new()),
            floor: None,
            development: false,
        }
    }

    leveled! {
        Debug => debug, debugf, debugw;
        Info => info, infof, infow;
        Warn => warn, warnf, warnw;
        Error => error, errorf, errorw;
        DPanic => dpanic, dpanicf, dpanicw;
        Panic => panic, panicf, panicw;
        Fatal => fatal, fatalf, fatalw;
    }

    pub fn warning(&self, args: &[&dyn fmt::Display]) {
        self.warn(args)
    }

    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.warnf(args)
    }

    pub fn notice(&self, args: &[&dyn fmt::Display]) {
        self.info(args)
    }

    pub fn noticef(&self, args: fmt::Arguments<'_>) {
        self.infof(args)
    }

    pub fn critical(&self, args: &[&dyn fmt::Display]) {
        self.error(args)
    }

    pub fn criticalf(&self, args: fmt::Arguments<'_>) {
        self.errorf(args)
    }

    /// Log a message with structured fields at an explicit severity.
    pub fn log(&self, severity: Severity, msg: &str, fields: &[Field]) {
        self.emit(severity, fields, || msg.to_string());
    }

    /// Like [`Logger::log`], with the message and fields built only when the
    /// entry is enabled. `severity` must not be terminal.
    pub(crate) fn log_deferred(
        &self,
        severity: Severity,
        build: impl FnOnce() -> (String, Vec<Field>),
    ) {
        debug_assert!(!severity.is_terminal());
        if !self.shared.check(&self.name, severity, self.floor) {
            return;
        }
        let (message, fields) = build();
        self.shared.write(&self.name, severity, &message, &self.fields, &fields);
    }

    /// The logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context fields carried by this handle.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Returns true when an entry at `severity` would be written.
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    /// Effective threshold: the spec level, raised by the handle's floor.
    pub fn threshold(&self) -> Severity {
        let level = self.shared.level(&self.name);
        match self.floor {
            Some(floor) => level.max(floor),
            None => level,
        }
    }

    /// True when both handles refer to the same registered logger of the
    /// same facility.
    pub fn same_logger(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.name, &other.name) && Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// A child logger named `<name>.<suffix>`, keeping fields and options.
    ///
    /// # Panics
    /// When the composed name is not a valid logger name.
    pub fn named(&self, suffix: &str) -> Logger {
        let name = format!("{}.{}", self.name, suffix);
        match self.shared.intern(&name) {
            Ok(name) => Logger {
                name,
                ..self.clone()
            },
            Err(e) => panic!("{e}"),
        }
    }

    /// A copy of this handle with additional context fields.
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        let mut all = self.fields.to_vec();
        all.extend_from_slice(fields);
        Logger {
            fields: Arc::from(all),
            ..self.clone()
        }
    }

    /// A copy of this handle with the given options applied in order.
    pub fn with_options(&self, options: impl IntoIterator<Item = LoggerOption>) -> Logger {
        let mut logger = self.clone();
        for option in options {
            match option {
                LoggerOption::Fields(fields) => logger = logger.with(&fields),
                LoggerOption::IncreaseLevel(level) => {
                    logger.floor = Some(logger.floor.map_or(level, |floor| floor.max(level)));
                }
                LoggerOption::Development(enabled) => logger.development = enabled,
            }
        }
        logger
    }

    /// Flush the facility's current writer.
    pub fn sync(&self) -> io::Result<()> {
        self.shared.sync()
    }

    fn emit(&self, severity: Severity, fields: &[Field], message: impl FnOnce() -> String) {
        let enabled = self.shared.check(&self.name, severity, self.floor);
        if !enabled && !severity.is_terminal() {
            return;
        }

        let message = message();
        if enabled {
            self.shared.write(&self.name, severity, &message, &self.fields, fields);
        }
        self.terminate(severity, message);
    }

    fn terminate(&self, severity: Severity, message: String) {
        match severity {
            Severity::Fatal => {
                let _ = self.shared.sync();
                std::process::exit(1);
            }
            Severity::Panic => panic!("{message}"),
            Severity::DPanic if self.development => panic!("{message}"),
            _ => {}
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("floor", &self.floor)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

fn join_args(args: &[&dyn fmt::Display]) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out
}
