//! Fan-out writer.

use std::io;

use crate::sink::{LogWriter, SharedWriter};

/// Writes every record to each inner writer in order.
///
/// All writers are attempted; the first error is returned.
pub struct TeeWriter {
    writers: Vec<SharedWriter>,
}

impl TeeWriter {
    pub fn new(writers: Vec<SharedWriter>) -> Self {
        Self { writers }
    }

    pub fn writers(&self) -> &[SharedWriter] {
        &self.writers
    }
}

impl LogWriter for TeeWriter {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        let mut result = Ok(());
        for writer in &self.writers {
            if let Err(e) = writer.write(record) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    fn flush(&self) -> io::Result<()> {
        let mut result = Ok(());
        for writer in &self.writers {
            if let Err(e) = writer.flush() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}
