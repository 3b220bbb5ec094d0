//! Trait definitions for external interactions
//!
//! These traits define the boundary between the engine and its only
//! external resource, the ledger's append target. Implementations live in
//! the infrastructure crates.

use std::io;

/// Trait for the ledger's append target (a file or stream).
///
/// Records are written and flushed synchronously per event; there is no
/// buffering or pooling on the engine side.
pub trait LedgerSink {
    /// Write one line-delimited record, followed by a newline.
    fn write_record(&mut self, record: &str) -> io::Result<()>;

    /// Flush the underlying target.
    fn flush(&mut self) -> io::Result<()>;
}

/// In-memory sink collecting records, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far, in order.
    pub fn records(&self) -> &[String] {
        &self.records
    }
}

impl LedgerSink for MemorySink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.records.push(record.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: io::Write> LedgerSink for io::BufWriter<W> {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        use std::io::Write;
        writeln!(self, "{}", record)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let mut sink = MemorySink::new();
        sink.write_record("one").unwrap();
        sink.write_record("two").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.records(), ["one", "two"]);
    }
}
