//! Process-wide default facility and free-function shortcuts.

use once_cell::sync::Lazy;

use crate::config::LoggingConfig;
use crate::facility::Logging;
use crate::level::Severity;
use crate::logger::Logger;
use crate::observability::observer::SharedObserver;
use crate::sink::SharedWriter;

static GLOBAL: Lazy<Logging> = Lazy::new(Logging::new);

/// Logger used by the facility for its own warnings.
const INTERNAL_LOGGER: &str = "logspec";

/// The process-wide facility, created with defaults on first use.
pub fn global() -> &'static Logging {
    &GLOBAL
}

/// The global logger named `name`.
///
/// # Panics
/// When `name` is not a valid logger name.
pub fn must_get_logger(name: &str) -> Logger {
    GLOBAL.logger(name)
}

/// A logger on its own facility configured from `config`, independent of
/// the global one. Typically used with a `file` target for a dedicated log.
///
/// # Panics
/// When the config is rejected or `name` is not a valid logger name.
pub fn must_get_file_logger(name: &str, config: &LoggingConfig) -> Logger {
    match Logging::with_config(config) {
        Ok(logging) => logging.logger(name),
        Err(e) => panic!("{e}"),
    }
}

/// Effective level of `name`, upper-cased (e.g. `"DEBUG"`).
pub fn logger_level(name: &str) -> String {
    GLOBAL.level(name).as_upper_str().to_string()
}

/// Activate `spec` on the global facility.
///
/// # Panics
/// When `spec` does not parse.
pub fn activate_spec(spec: &str) {
    if let Err(e) = GLOBAL.activate_spec(spec) {
        panic!("{e}");
    }
}

/// Activate `level`. When it does not parse, `info` is activated and a
/// warning is logged under it.
pub fn set_global_log_level(level: &str) {
    if GLOBAL.activate_spec(level).is_err() {
        // "info" always parses
        let _ = GLOBAL.activate_spec(Severity::Info.as_str());
        GLOBAL
            .logger(INTERNAL_LOGGER)
            .warningf(format_args!("unknown log level '{level}', using {}", Severity::Info));
    }
}

/// Apply `config` to the global facility.
///
/// # Panics
/// When the config is rejected.
pub fn init(config: &LoggingConfig) {
    if let Err(e) = GLOBAL.apply(config) {
        panic!("{e}");
    }
}

/// Restore the global facility to its defaults.
pub fn reset() {
    // The default config always applies.
    let _ = GLOBAL.apply(&LoggingConfig::default());
}

/// Install `writer` on the global facility, returning the previous one.
pub fn set_writer(writer: SharedWriter) -> SharedWriter {
    GLOBAL.set_writer(writer)
}

/// Install `observer` on the global facility, returning the previous one.
pub fn set_observer(observer: Option<SharedObserver>) -> Option<SharedObserver> {
    GLOBAL.set_observer(observer)
}
