//! Crash/diagnostic report scanner.
//!
//! Reads `.ips` and `.crash` files from the DiagnosticReports directories
//! and emits one summary record per file — always. The defining contract is
//! "never omit, always degrade": unreadable bytes, truncated JSON, or a
//! missing header field leave `"Unknown"` in the affected fields while the
//! filesystem-derived fields stay populated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use hs_protocol::{CrashEntry, CrashFormat};

/// How many leading lines of a `.crash` report the key-value header can
/// reasonably span.
const HEADER_SCAN_LINES: usize = 30;

/// A crash file found during the listing pass, with its metadata.
struct CandidateFile {
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

/// Scans the user- and system-level diagnostic report directories.
#[derive(Debug, Clone)]
pub struct CrashReportScanner {
    dirs: Vec<PathBuf>,
}

impl CrashReportScanner {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The two macOS DiagnosticReports locations.
    pub fn default_locations() -> Self {
        let mut dirs = Vec::new();
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Logs/DiagnosticReports"));
        }
        dirs.push(PathBuf::from("/Library/Logs/DiagnosticReports"));
        Self::new(dirs)
    }

    /// Produce one entry per crash file, most recently modified first,
    /// truncated to `limit`. Missing or unreadable directories contribute
    /// nothing — a machine with no crashes is a normal state, not an error.
    pub async fn scan(&self, limit: Option<usize>) -> Vec<CrashEntry> {
        let mut candidates = Vec::new();
        for dir in &self.dirs {
            candidates.extend(list_crash_files(dir).await);
        }

        candidates.sort_by(|a, b| b.modified.cmp(&a.modified));
        if let Some(limit) = limit {
            candidates.truncate(limit);
        }

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            entries.push(parse_crash_file(candidate).await);
        }
        entries
    }
}

async fn list_crash_files(dir: &Path) -> Vec<CandidateFile> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), %err, "crash report directory unavailable");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    while let Ok(Some(dirent)) = read_dir.next_entry().await {
        let path = dirent.path();
        let recognized = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ips") | Some("crash")
        );
        if !recognized {
            continue;
        }
        // A file that vanished between listing and stat is simply gone.
        let Ok(meta) = dirent.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        found.push(CandidateFile {
            path,
            size: meta.len(),
            modified,
        });
    }
    found
}

async fn parse_crash_file(candidate: CandidateFile) -> CrashEntry {
    let CandidateFile {
        path,
        size,
        modified,
    } = candidate;

    let content = match tokio::fs::read(&path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "crash file unreadable");
            String::new()
        }
    };

    let (format, fields) = match detect_format(&content) {
        CrashFormat::Ips => (CrashFormat::Ips, extract_ips(&content)),
        CrashFormat::Crash => (CrashFormat::Crash, extract_key_value(&content)),
        CrashFormat::Unknown => (CrashFormat::Unknown, ParsedFields::default()),
    };

    CrashEntry {
        file_path: path.display().to_string(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        format,
        timestamp: or_unknown(fields.timestamp),
        process: or_unknown(fields.process),
        exception_type: or_unknown(fields.exception_type),
        exception_message: or_unknown(fields.exception_message),
        crash_location: path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        file_size: size,
        modified_time: modified,
    }
}

/// Feature-detection probe over the file content (not the extension): a
/// leading JSON object line marks the newer structured-header encoding, a
/// `Key: value` header block marks the legacy text encoding.
fn detect_format(content: &str) -> CrashFormat {
    let Some(first) = content.lines().find(|l| !l.trim().is_empty()) else {
        return CrashFormat::Unknown;
    };
    if first.trim_start().starts_with('{')
        && serde_json::from_str::<serde_json::Value>(first).is_ok_and(|v| v.is_object())
    {
        return CrashFormat::Ips;
    }
    let looks_key_value = content
        .lines()
        .take(HEADER_SCAN_LINES)
        .any(|l| KEY_VALUE_KEYS.iter().any(|k| l.trim_start().starts_with(k)));
    if looks_key_value {
        CrashFormat::Crash
    } else {
        CrashFormat::Unknown
    }
}

const KEY_VALUE_KEYS: &[&str] = &["Process:", "Date/Time:", "Exception Type:", "Identifier:"];

#[derive(Debug, Default)]
struct ParsedFields {
    timestamp: Option<String>,
    process: Option<String>,
    exception_type: Option<String>,
    exception_message: Option<String>,
}

/// Compact header line of an `.ips` report.
#[derive(Debug, Deserialize)]
struct IpsHeader {
    timestamp: Option<String>,
    #[serde(alias = "procName", alias = "name")]
    app_name: Option<String>,
}

/// Minimal typed view of the trailing `.ips` payload — only the exception
/// block is decoded, the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
struct IpsPayload {
    exception: Option<IpsException>,
}

#[derive(Debug, Deserialize)]
struct IpsException {
    #[serde(rename = "type")]
    kind: Option<String>,
    signal: Option<String>,
    subtype: Option<String>,
    message: Option<String>,
}

fn extract_ips(content: &str) -> ParsedFields {
    let mut fields = ParsedFields::default();

    let mut lines = content.splitn(2, '\n');
    let header_line = lines.next().unwrap_or_default();
    let payload = lines.next().unwrap_or_default();

    if let Ok(header) = serde_json::from_str::<IpsHeader>(header_line) {
        fields.timestamp = header.timestamp;
        fields.process = header.app_name;
    }

    if let Ok(body) = serde_json::from_str::<IpsPayload>(payload) {
        if let Some(exc) = body.exception {
            fields.exception_type = exc.kind;
            fields.exception_message = exc.message.or(exc.subtype).or(exc.signal);
        }
    }

    fields
}

fn extract_key_value(content: &str) -> ParsedFields {
    let mut fields = ParsedFields::default();

    for line in content.lines().take(HEADER_SCAN_LINES) {
        let line = line.trim_start();
        if let Some(value) = line.strip_prefix("Process:") {
            // "Process: Safari [412]" — the name is the first word.
            fields.process = value.split_whitespace().next().map(str::to_string);
        } else if let Some(value) = line.strip_prefix("Date/Time:") {
            fields.timestamp = non_empty(value);
        } else if let Some(value) = line.strip_prefix("Exception Type:") {
            fields.exception_type = non_empty(value);
        } else if let Some(value) = line.strip_prefix("Exception Message:") {
            fields.exception_message = non_empty(value);
        } else if fields.exception_message.is_none() {
            if let Some(value) = line.strip_prefix("Exception Codes:") {
                fields.exception_message = non_empty(value);
            }
        }
    }

    fields
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const IPS_HEADER: &str = r#"{"app_name":"Safari","timestamp":"2025-10-31 09:12:44.00 +0200","incident_id":"8C6F1E0A","bug_type":"309"}"#;
    const IPS_PAYLOAD: &str = r#"{"uptime":4100,"procName":"Safari","exception":{"codes":"0x0000000000000000","type":"EXC_CRASH","signal":"SIGABRT"}}"#;

    const CRASH_TEXT: &str = "\
Process:               Notes [812]
Path:                  /System/Applications/Notes.app/Contents/MacOS/Notes
Identifier:            com.apple.Notes
Date/Time:             2025-10-30 22:01:13.512 +0200
Exception Type:        EXC_BAD_ACCESS (SIGSEGV)
Exception Codes:       KERN_INVALID_ADDRESS at 0x0000000000000010
";

    async fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn ips_header_and_exception_are_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("{IPS_HEADER}\n{IPS_PAYLOAD}");
        write(dir.path(), "Safari-2025-10-31.ips", content.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(None).await;
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.format, CrashFormat::Ips);
        assert_eq!(e.process, "Safari");
        assert_eq!(e.timestamp, "2025-10-31 09:12:44.00 +0200");
        assert_eq!(e.exception_type, "EXC_CRASH");
        assert_eq!(e.exception_message, "SIGABRT");
        assert!(e.file_size > 0);
    }

    #[tokio::test]
    async fn legacy_crash_header_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Notes-2025-10-30.crash", CRASH_TEXT.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(None).await;
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.format, CrashFormat::Crash);
        assert_eq!(e.process, "Notes");
        assert_eq!(e.timestamp, "2025-10-30 22:01:13.512 +0200");
        assert_eq!(e.exception_type, "EXC_BAD_ACCESS (SIGSEGV)");
        assert_eq!(
            e.exception_message,
            "KERN_INVALID_ADDRESS at 0x0000000000000010"
        );
    }

    #[tokio::test]
    async fn arbitrary_bytes_still_yield_one_entry_per_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "garbage.crash", &[0xff, 0xfe, 0x00, 0x9c]).await;
        write(dir.path(), "empty.ips", b"").await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(None).await;
        assert_eq!(entries.len(), 2);
        for e in &entries {
            assert_eq!(e.format, CrashFormat::Unknown);
            assert_eq!(e.process, "Unknown");
            assert_eq!(e.timestamp, "Unknown");
            assert!(!e.file_path.is_empty());
            assert!(!e.file_name.is_empty());
        }
    }

    #[tokio::test]
    async fn truncated_ips_degrades_field_by_field() {
        let dir = tempfile::tempdir().unwrap();
        // Valid header, payload cut off mid-object.
        let content = format!("{IPS_HEADER}\n{{\"exception\":{{\"ty");
        write(dir.path(), "partial.ips", content.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(None).await;
        let e = &entries[0];
        assert_eq!(e.format, CrashFormat::Ips);
        assert_eq!(e.process, "Safari");
        assert_eq!(e.exception_type, "Unknown");
        assert_eq!(e.exception_message, "Unknown");
    }

    #[tokio::test]
    async fn unrecognized_extensions_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", b"not a report").await;
        write(dir.path(), "report.ips", IPS_HEADER.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(None).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "report.ips");
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_not_error() {
        let scanner = CrashReportScanner::new(vec![PathBuf::from("/nonexistent/reports")]);
        assert!(scanner.scan(None).await.is_empty());
    }

    #[tokio::test]
    async fn newest_first_and_limit_applies() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "old.ips", IPS_HEADER.as_bytes()).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        write(dir.path(), "mid.ips", IPS_HEADER.as_bytes()).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        write(dir.path(), "new.ips", IPS_HEADER.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![dir.path().to_path_buf()]);
        let entries = scanner.scan(Some(2)).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "new.ips");
        assert_eq!(entries[1].file_name, "mid.ips");
    }

    #[tokio::test]
    async fn crash_location_names_containing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("DiagnosticReports");
        tokio::fs::create_dir(&reports).await.unwrap();
        write(&reports, "app.crash", CRASH_TEXT.as_bytes()).await;

        let scanner = CrashReportScanner::new(vec![reports]);
        let entries = scanner.scan(None).await;
        assert_eq!(entries[0].crash_location, "DiagnosticReports");
    }
}
