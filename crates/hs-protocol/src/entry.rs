//! Normalized entry shapes — one per log family.
//!
//! Timestamps coming out of text sources are kept as verbatim strings with
//! their original precision and UTC offset; only filesystem mtimes are
//! typed (`DateTime<Utc>`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized event from a unified-log-backed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// Original timestamp text, trimmed but never reformatted.
    pub timestamp: String,
    /// Emitting host; `"localhost"` when the source omits it.
    pub hostname: String,
    /// Emitting process; `"Unknown"` when no `process[pid]` marker exists.
    pub process: String,
    /// Process identifier, kept textual (some sources emit non-numeric ids).
    pub pid: String,
    /// Severity classification (Error, Fault, Default, ...); `"Unknown"`
    /// when the source does not signal one.
    pub level: String,
    /// Human-readable payload; continuation lines are folded in,
    /// newline-joined.
    pub message: String,
    /// Which logical source produced this entry (system, kernel, ...).
    pub log_type: String,
    /// Verbatim source line(s), never mutated.
    pub raw: String,
}

/// On-disk encoding of a crash/diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrashFormat {
    /// Newer `.ips` reports: compact JSON header line + JSON payload.
    Ips,
    /// Older `.crash` reports: `Key: value` header lines.
    Crash,
    /// Recognized extension but unrecognizable content.
    Unknown,
}

/// Summary record for one crash/diagnostic report file.
///
/// `file_path`, `file_name`, `file_size` and `modified_time` always come
/// from filesystem metadata; the remaining fields degrade to `"Unknown"`
/// when the file content cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashEntry {
    pub file_path: String,
    pub file_name: String,
    pub format: CrashFormat,
    pub timestamp: String,
    pub process: String,
    pub exception_type: String,
    pub exception_message: String,
    /// Name of the containing directory (user vs system reports).
    pub crash_location: String,
    pub file_size: u64,
    pub modified_time: DateTime<Utc>,
}

/// One matched line from a package-manager log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageLogEntry {
    /// Leading timestamp text if the line carried one, otherwise the file
    /// mtime rendered as RFC 3339.
    pub timestamp: String,
    pub message: String,
    pub file_name: String,
    pub file_path: String,
    /// 1-based position within the source file.
    pub line_number: usize,
    pub file_mtime: DateTime<Utc>,
    /// Always `"package"`.
    pub log_type: String,
}

/// Any record the query layer can return, serialized by shape.
///
/// Untagged: the three shapes have disjoint mandatory fields
/// (`exception_type` / `line_number` / `hostname`), so deserialization is
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogRecord {
    Crash(CrashEntry),
    Package(PackageLogEntry),
    Unified(NormalizedEntry),
}

impl From<NormalizedEntry> for LogRecord {
    fn from(e: NormalizedEntry) -> Self {
        Self::Unified(e)
    }
}

impl From<CrashEntry> for LogRecord {
    fn from(e: CrashEntry) -> Self {
        Self::Crash(e)
    }
}

impl From<PackageLogEntry> for LogRecord {
    fn from(e: PackageLogEntry) -> Self {
        Self::Package(e)
    }
}
