//! Bridge from `tracing` events to named loggers.
//!
//! # Responsibilities
//! - Map an event target (`a::b`) to a logger name (`a.b`)
//! - Map `tracing` levels to severities (TRACE folds into debug)
//! - Carry event fields over as structured fields
//! - Every event passes the observer check, enabled or not
//!
//! # Design Decisions
//! - Targets that are not valid logger names go to the `tracing` logger
//! - Events on the sink diagnostic target are dropped so a failing writer
//!   cannot feed itself

use std::fmt::Write as _;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::facility::{Logging, SINK_TARGET};
use crate::level::{is_valid_logger_name, Severity};
use crate::logger::Field;

/// Logger used for events whose target is not a valid logger name.
pub const FALLBACK_LOGGER: &str = "tracing";

/// A `tracing_subscriber` layer that forwards events to a facility.
#[derive(Clone, Debug)]
pub struct TracingBridge {
    logging: Logging,
}

impl TracingBridge {
    pub fn new(logging: Logging) -> Self {
        Self { logging }
    }
}

/// Logger name for a `tracing` target.
pub fn logger_name(target: &str) -> String {
    let name = target.replace("::", ".");
    if is_valid_logger_name(&name) {
        name
    } else {
        FALLBACK_LOGGER.to_string()
    }
}

/// Severity for a `tracing` level.
pub fn severity_for(level: &Level) -> Severity {
    match *level {
        Level::ERROR => Severity::Error,
        Level::WARN => Severity::Warn,
        Level::INFO => Severity::Info,
        Level::DEBUG | Level::TRACE => Severity::Debug,
    }
}

impl<S: Subscriber> Layer<S> for TracingBridge {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(SINK_TARGET) {
            return;
        }

        let severity = severity_for(metadata.level());
        let logger = match self.logging.try_logger(&logger_name(metadata.target())) {
            Ok(logger) => logger,
            Err(_) => self.logging.logger(FALLBACK_LOGGER),
        };
        logger.log_deferred(severity, || {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);
            (visitor.message, visitor.fields)
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(buf, "{value:?}");
        if field.name() == "message" {
            self.message = buf;
        } else {
            self.fields.push(Field::new(field.name(), buf));
        }
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::new(field.name(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Observer;
    use crate::sink::MemoryWriter;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    fn bridged(spec: &str) -> (Logging, Arc<MemoryWriter>, impl Subscriber + Send + Sync) {
        let logging = Logging::new();
        logging.activate_spec(spec).unwrap();
        let writer = Arc::new(MemoryWriter::new());
        logging.set_writer(writer.clone());
        let subscriber = tracing_subscriber::registry().with(TracingBridge::new(logging.clone()));
        (logging, writer, subscriber)
    }

    #[test]
    fn test_logger_name_mapping() {
        assert_eq!(logger_name("hyper::client::conn"), "hyper.client.conn");
        assert_eq!(logger_name("app"), "app");
        assert_eq!(logger_name("weird target"), FALLBACK_LOGGER);
        assert_eq!(logger_name(""), FALLBACK_LOGGER);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(severity_for(&Level::TRACE), Severity::Debug);
        assert_eq!(severity_for(&Level::DEBUG), Severity::Debug);
        assert_eq!(severity_for(&Level::WARN), Severity::Warn);
        assert_eq!(severity_for(&Level::ERROR), Severity::Error);
    }

    #[test]
    fn test_events_are_forwarded() {
        let (logging, writer, subscriber) = bridged("info:db.pool=error");

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "api::server", port = 8080u64, "Listening");
            tracing::warn!(target: "db::pool", "Slow query");
            tracing::error!(target: "db::pool", reason = "timeout", "Connection lost");
            tracing::debug!(target: "api::server", "Hidden");
        });

        let records = writer.records();
        assert_eq!(records.len(), 2, "{records:?}");
        assert!(records[0].ends_with("[api.server] -> INFO 001 Listening port=8080"), "{}", records[0]);
        assert!(records[1].ends_with("[db.pool] -> ERRO 002 Connection lost reason=timeout"), "{}", records[1]);

        let names: Vec<String> = logging.loggers().into_iter().map(|l| l.name).collect();
        assert!(names.contains(&"api.server".to_string()));
    }

    #[derive(Default)]
    struct CheckCounter {
        checked: AtomicU64,
        written: AtomicU64,
    }

    impl Observer for CheckCounter {
        fn check(&self, _severity: Severity, _logger: &str) {
            self.checked.fetch_add(1, Ordering::Relaxed);
        }

        fn write_entry(&self, _severity: Severity, _logger: &str) {
            self.written.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_suppressed_events_are_still_checked() {
        let (logging, writer, subscriber) = bridged("error");
        let observer = Arc::new(CheckCounter::default());
        logging.set_observer(Some(observer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "grpc", "Dropped by the spec");
        });
        logging.logger("grpc").info(&[&"Dropped too"]);

        assert_eq!(observer.checked.load(Ordering::Relaxed), 2);
        assert_eq!(observer.written.load(Ordering::Relaxed), 0);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_sink_target_is_skipped() {
        let (_logging, writer, subscriber) = bridged("debug");

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "logspec::sink", "Failed to write log record");
        });
        assert!(writer.is_empty());
    }
}
