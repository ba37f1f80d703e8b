//! Shared utilities for integration tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use logspec::sink::MemoryWriter;
use logspec::{Logging, Observer, Severity};

/// A facility with `spec` active, writing into memory.
#[allow(dead_code)]
pub fn capture(spec: &str) -> (Logging, Arc<MemoryWriter>) {
    let logging = Logging::new();
    logging.activate_spec(spec).unwrap();
    let writer = Arc::new(MemoryWriter::new());
    logging.set_writer(writer.clone());
    (logging, writer)
}

/// Counts observer callbacks per severity.
#[derive(Default)]
#[allow(dead_code)]
pub struct CountingObserver {
    checked: Mutex<HashMap<Severity, u64>>,
    written: Mutex<HashMap<Severity, u64>>,
}

#[allow(dead_code)]
impl CountingObserver {
    pub fn checked(&self, severity: Severity) -> u64 {
        self.checked.lock().get(&severity).copied().unwrap_or(0)
    }

    pub fn written(&self, severity: Severity) -> u64 {
        self.written.lock().get(&severity).copied().unwrap_or(0)
    }
}

impl Observer for CountingObserver {
    fn check(&self, severity: Severity, _logger: &str) {
        *self.checked.lock().entry(severity).or_default() += 1;
    }

    fn write_entry(&self, severity: Severity, _logger: &str) {
        *self.written.lock().entry(severity).or_default() += 1;
    }
}
