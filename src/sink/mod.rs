//! Output sinks.
//!
//! # Responsibilities
//! - Define the `LogWriter` contract used by the facility's writer slot
//! - Provide console, rotating file, fan-out and in-memory writers
//!
//! # Design Decisions
//! - Writes are synchronous; no background queue
//! - A writer receives fully encoded records, one call per record
//! - Composition (console + file) is built by the caller with `TeeWriter`

pub mod console;
pub mod memory;
pub mod rotation;
pub mod tee;

use std::io;
use std::sync::Arc;

pub use console::{ConsoleStream, ConsoleWriter};
pub use memory::MemoryWriter;
pub use rotation::{RotatingFileWriter, RotationConfig};
pub use tee::TeeWriter;

/// An append-only destination for encoded log records.
pub trait LogWriter: Send + Sync {
    /// Append one encoded record.
    fn write(&self, record: &[u8]) -> io::Result<()>;

    /// Flush buffered data, if any.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer as stored in the facility's writer slot.
pub type SharedWriter = Arc<dyn LogWriter>;

/// Address of the writer object, for identity comparisons.
pub fn writer_addr(writer: &SharedWriter) -> *const () {
    Arc::as_ptr(writer) as *const ()
}
