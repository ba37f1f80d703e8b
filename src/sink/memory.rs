//! In-memory writer, mainly for tests and temporary redirection.

use parking_lot::Mutex;
use std::io;

use crate::sink::LogWriter;

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    records: Mutex<Vec<String>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written so far, trailing newlines removed.
    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }

    /// Everything written so far, concatenated.
    pub fn contents(&self) -> String {
        self.records
            .lock()
            .iter()
            .map(|record| format!("{record}\n"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogWriter for MemoryWriter {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(record);
        self.records
            .lock()
            .push(text.trim_end_matches('\n').to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_writer_collects_records() {
        let writer = MemoryWriter::new();
        assert!(writer.is_empty());

        writer.write(b"first\n").unwrap();
        writer.write(b"second").unwrap();

        assert_eq!(writer.records(), vec!["first", "second"]);
        assert_eq!(writer.contents(), "first\nsecond\n");
        assert_eq!(writer.len(), 2);

        writer.clear();
        assert!(writer.is_empty());
    }
}
