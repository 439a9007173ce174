//! Durable audit trail for drops and blacklist transitions.
//!
//! Append-mode text file, one timestamped record per line. Write failures
//! are logged and swallowed: losing an audit line must never take down the
//! filter.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use parking_lot::Mutex;
use tracing::error;

pub struct AuditLog {
    writer: Mutex<BufWriter<File>>,
}

impl AuditLog {
    /// Opens (or creates) the audit file in append mode.
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// One record per dropped message.
    pub fn drop_record(&self, category: &str, identifier: &str, reason: &str, size: usize) {
        self.write_line(&format!(
            "DROP - {category} - {identifier} - {reason} - Size: {size}b"
        ));
    }

    /// One record per blacklist state transition (BLACKLISTED / UNBLACKLISTED).
    pub fn blacklist_record(&self, action: &str, identifier: &str, detail: &str) {
        self.write_line(&format!("BLACKLIST - {action} - {identifier} - {detail}"));
    }

    /// Free-form lines, used for the startup banner and final stats.
    pub fn note(&self, line: &str) {
        self.write_line(line);
    }

    fn write_line(&self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{stamp} - {message}").and_then(|_| writer.flush()) {
            error!("Audit log write failed: {e}");
        }
    }
}

/// Formats a Unix-millisecond expiry as local wall-clock time for audit
/// details ("banned until 14:03:27").
pub fn format_time_ms(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn records_are_appended_with_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");

        let log = AuditLog::open(&path).unwrap();
        log.drop_record("Certificate", "aabbccdd...", "Certificate revoked in CRL", 356);
        log.blacklist_record("BLACKLISTED", "0102030405060708", "3 violations in 60s");
        drop(log);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("DROP - Certificate - aabbccdd... - Certificate revoked in CRL - Size: 356b"));
        assert!(lines[1].contains("BLACKLIST - BLACKLISTED - 0102030405060708"));
    }

    #[test]
    fn reopening_appends_rather_than_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");

        AuditLog::open(&path).unwrap().note("first run");
        AuditLog::open(&path).unwrap().note("second run");

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn format_time_ms_is_wall_clock() {
        // 1970-01-02 00:00:00 UTC, rendered in the local zone; just check
        // the shape.
        let s = format_time_ms(86_400_000);
        assert_eq!(s.len(), 8);
        assert_eq!(s.matches(':').count(), 2);
    }
}
