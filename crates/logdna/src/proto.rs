use crate::time::unix_millis;
use compact_str::CompactString;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A single log line in the ingest payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Milliseconds since the Unix epoch
    timestamp: i64,
    line: String,
    /// source file or app label
    file: CompactString,
}

/// The complete JSON payload sent to the ingest API.
///
/// Lines are kept in the order they were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    lines: Vec<LogLine>,
}

impl LogLine {
    /// Create a new log line, truncating `timestamp` to whole milliseconds.
    pub fn new(
        timestamp: Timestamp,
        line: impl Into<String>,
        file: impl Into<CompactString>,
    ) -> Self {
        LogLine {
            timestamp: unix_millis(timestamp),
            line: line.into(),
            file: file.into(),
        }
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The log message.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The source file label, empty if unset.
    pub fn file(&self) -> &str {
        &self.file
    }
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Payload { lines: Vec::new() }
    }

    /// Buffered lines, in append order.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the payload holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn push(&mut self, line: LogLine) {
        self.lines.push(line);
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    pub(crate) fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl FromIterator<LogLine> for Payload {
    fn from_iter<I: IntoIterator<Item = LogLine>>(iter: I) -> Self {
        Payload {
            lines: iter.into_iter().collect(),
        }
    }
}
