//! Facility behavior under concurrent use and reconfiguration.

mod common;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use logspec::sink::{writer_addr, MemoryWriter};
use logspec::{LevelSpec, Logging, LoggingConfig, Severity, SharedWriter};

use common::{capture, CountingObserver};

#[test]
fn test_reset_is_idempotent() {
    let logging = Logging::new();
    logging.activate_spec("error:a=debug").unwrap();

    logging.activate_spec("").unwrap();
    let once = logging.levels();
    logging.activate_spec("").unwrap();
    let twice = logging.levels();

    assert_eq!(*once, *twice);
    assert_eq!(*twice, LevelSpec::default());
    for name in ["a", "a.b", "other"] {
        assert_eq!(once.level(name), twice.level(name));
    }
}

#[test]
fn test_concurrent_readers_never_see_mixed_spec() {
    // Both specs give "app" and "other" the same level, so a reader that
    // saw a mix of the two would observe them differ.
    const SPECS: [&str; 2] = ["debug:app=debug", "error:app=error"];

    let logging = Logging::new();
    logging.activate_spec(SPECS[0]).unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let logging = logging.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut reads = 0u64;
                loop {
                    let spec = logging.levels();
                    let app = spec.level("app");
                    assert_eq!(app, spec.level("other"));
                    assert!(app == Severity::Debug || app == Severity::Error);
                    reads += 1;
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                }
                reads
            })
        })
        .collect();

    for i in 0..2_000 {
        logging.activate_spec(SPECS[i % 2]).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    let total: u64 = readers.into_iter().map(|r| r.join().unwrap()).sum();
    assert!(total > 0);
}

#[test]
fn test_concurrent_logger_creation_shares_identity() {
    let logging = Logging::new();
    logging.activate_spec("warn:x=debug").unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let logging = logging.clone();
            thread::spawn(move || logging.logger("x"))
        })
        .collect();
    let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for logger in &loggers {
        assert!(logger.same_logger(&loggers[0]));
        assert!(logger.is_enabled_for(Severity::Debug));
    }
    assert_eq!(logging.loggers().len(), 1);

    logging.activate_spec("error").unwrap();
    for logger in &loggers {
        assert!(!logger.is_enabled_for(Severity::Warn));
    }
}

struct Counted<'a>(&'a AtomicUsize);

impl fmt::Display for Counted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fetch_add(1, Ordering::SeqCst);
        f.write_str("formatted")
    }
}

#[test]
fn test_suppressed_calls_never_format() {
    let (logging, writer) = capture("error");
    let logger = logging.logger("quiet");
    let calls = AtomicUsize::new(0);

    logger.debug(&[&Counted(&calls)]);
    logger.info(&[&Counted(&calls)]);
    logger.warnf(format_args!("{}", Counted(&calls)));
    logger.debugw("message", &[]);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(writer.is_empty());
}

#[test]
fn test_set_writer_delivers_only_to_new_writer() {
    let (logging, old) = capture("info");
    let logger = logging.logger("app");
    logger.info(&[&"before"]);

    let new = Arc::new(MemoryWriter::new());
    let previous = logging.set_writer(new.clone());
    let old_shared: SharedWriter = old.clone();
    assert_eq!(writer_addr(&previous), writer_addr(&old_shared));

    logger.info(&[&"after"]);
    assert_eq!(old.len(), 1);
    assert_eq!(new.len(), 1);
    assert!(new.records()[0].ends_with("after"));
}

#[test]
fn test_grpc_example() {
    let logging = Logging::new();
    logging.activate_spec("info:grpc=error").unwrap();

    assert!(!logging.is_enabled("grpc", Severity::Warn));
    assert!(logging.is_enabled("grpc", Severity::Error));
    assert!(logging.is_enabled("app", Severity::Info));
}

#[test]
fn test_observer_counts_every_check() {
    let (logging, _writer) = capture("warn");
    let observer = Arc::new(CountingObserver::default());
    logging.set_observer(Some(observer.clone()));

    let logger = logging.logger("app");
    logger.info(&[&"dropped"]);
    logger.warn(&[&"kept"]);
    logger.warn(&[&"kept"]);

    assert_eq!(observer.checked(Severity::Info), 1);
    assert_eq!(observer.checked(Severity::Warn), 2);
    assert_eq!(observer.written(Severity::Info), 0);
    assert_eq!(observer.written(Severity::Warn), 2);
}

#[test]
fn test_apply_switches_encoder_and_spec() {
    let (logging, _writer) = capture("info");
    let config = LoggingConfig {
        level_spec: "debug".into(),
        format: logspec::config::LogFormat::Json,
        ..LoggingConfig::default()
    };
    logging.apply(&config).unwrap();

    assert_eq!(logging.spec(), "debug");
    assert_eq!(logging.encoder(), logspec::Encoder::Json);

    // apply installs a fresh writer; capture again to inspect output
    let writer = Arc::new(MemoryWriter::new());
    logging.set_writer(writer.clone());
    logging.logger("app").debugw("json", &logspec::fields!["n" => 1]);

    let value: serde_json::Value = serde_json::from_str(&writer.records()[0]).unwrap();
    assert_eq!(value["msg"], "json");
    assert_eq!(value["level"], "debug");
    assert_eq!(value["n"], 1);
}
