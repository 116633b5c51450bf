use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::model::ParseError;

/// Parse counters shared across pipeline workers.
///
/// Plain relaxed atomics: every counter is monotonic and only read when a
/// snapshot is taken for reporting.
#[derive(Debug, Default)]
pub struct ParseMetrics {
    lines: AtomicU64,
    records: AtomicU64,
    malformed_timestamp: AtomicU64,
    malformed_address: AtomicU64,
    malformed_duration: AtomicU64,
    malformed_status_code: AtomicU64,
    malformed_byte_count: AtomicU64,
    truncated: AtomicU64,
    non_utf8: AtomicU64,
}

impl ParseMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self) {
        self.lines.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, err: &ParseError) {
        let counter = match err {
            ParseError::MalformedTimestamp(_) => &self.malformed_timestamp,
            ParseError::MalformedAddress(_) => &self.malformed_address,
            ParseError::MalformedDuration(_) => &self.malformed_duration,
            ParseError::MalformedStatusCode(_) => &self.malformed_status_code,
            ParseError::MalformedByteCount(_) => &self.malformed_byte_count,
            ParseError::Truncated(_) => &self.truncated,
            ParseError::NonUtf8(_) => &self.non_utf8,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let malformed_timestamp = self.malformed_timestamp.load(Ordering::Relaxed);
        let malformed_address = self.malformed_address.load(Ordering::Relaxed);
        let malformed_duration = self.malformed_duration.load(Ordering::Relaxed);
        let malformed_status_code = self.malformed_status_code.load(Ordering::Relaxed);
        let malformed_byte_count = self.malformed_byte_count.load(Ordering::Relaxed);
        let truncated = self.truncated.load(Ordering::Relaxed);
        let non_utf8 = self.non_utf8.load(Ordering::Relaxed);
        MetricsSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            failures: malformed_timestamp
                + malformed_address
                + malformed_duration
                + malformed_status_code
                + malformed_byte_count
                + truncated
                + non_utf8,
            malformed_timestamp,
            malformed_address,
            malformed_duration,
            malformed_status_code,
            malformed_byte_count,
            truncated,
            non_utf8,
        }
    }
}

/// Point-in-time copy of the counters, serializable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines: u64,
    pub records: u64,
    pub failures: u64,
    pub malformed_timestamp: u64,
    pub malformed_address: u64,
    pub malformed_duration: u64,
    pub malformed_status_code: u64,
    pub malformed_byte_count: u64,
    pub truncated: u64,
    pub non_utf8: u64,
}
