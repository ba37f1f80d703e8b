//! Console writer.

use std::io::{self, Write};

use crate::sink::LogWriter;

/// Which standard stream the console writer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stderr,
    Stdout,
}

/// Writes records to stderr (the default) or stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter {
    stream: ConsoleStream,
}

impl ConsoleWriter {
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl LogWriter for ConsoleWriter {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        // Lock for the whole record so concurrent lines do not interleave.
        match self.stream {
            ConsoleStream::Stderr => io::stderr().lock().write_all(record),
            ConsoleStream::Stdout => io::stdout().lock().write_all(record),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stderr => io::stderr().flush(),
            ConsoleStream::Stdout => io::stdout().flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stderr() {
        assert_eq!(ConsoleWriter::default().stream(), ConsoleStream::Stderr);
        assert_eq!(ConsoleWriter::stdout().stream(), ConsoleStream::Stdout);
    }

    #[test]
    fn test_console_write_succeeds() {
        let writer = ConsoleWriter::stderr();
        writer.write(b"console writer test\n").unwrap();
        writer.flush().unwrap();
    }
}
