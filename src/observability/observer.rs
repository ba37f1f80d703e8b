//! Observer hook invoked on every log call.

use std::sync::Arc;

use crate::level::Severity;

/// Receives a callback for every checked entry and every written entry.
///
/// `check` runs for every call, enabled or not, before any formatting.
/// `write_entry` runs only for entries that pass the level check.
pub trait Observer: Send + Sync {
    fn check(&self, severity: Severity, logger: &str);

    fn write_entry(&self, severity: Severity, logger: &str);
}

/// Observer as stored in the facility's observer slot.
pub type SharedObserver = Arc<dyn Observer>;
