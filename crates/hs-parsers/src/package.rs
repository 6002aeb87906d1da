//! Homebrew / package-manager log tailer.
//!
//! Tails the line-oriented `.log` files in the Homebrew log directory and
//! emits one entry per matched line, most recent first. A machine without
//! Homebrew (or with an empty log directory) yields zero entries — never an
//! error.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use hs_protocol::PackageLogEntry;

// Bare leading timestamp delimited by a colon: "2025-10-30 21:30:11: msg".
static LEADING_TS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}[^:]*):\s*(.*)$").unwrap()
});

/// Scans one of the two Homebrew log locations.
#[derive(Debug, Clone)]
pub struct PackageLogScanner {
    dirs: Vec<PathBuf>,
}

impl PackageLogScanner {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Candidate directories: Apple Silicon prefix first, then Intel.
    pub fn default_locations() -> Self {
        Self::new(vec![
            PathBuf::from("/opt/homebrew/var/log"),
            PathBuf::from("/usr/local/var/log"),
        ])
    }

    /// Tail every `.log` file in the first existing candidate directory,
    /// newest entries first, truncated to `limit`.
    pub async fn scan(&self, limit: Option<usize>) -> Vec<PackageLogEntry> {
        let Some(dir) = self.pick_directory().await else {
            return Vec::new();
        };

        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "package log directory unreadable");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        while let Ok(Some(dirent)) = read_dir.next_entry().await {
            let path = dirent.path();
            if path.extension().and_then(|e| e.to_str()) != Some("log") {
                continue;
            }
            entries.extend(tail_log_file(&path, limit).await);
        }

        // Most recent first: lexical timestamp order matches the common
        // date-prefixed formats, mtime breaks ties across files.
        entries.sort_by(|a, b| {
            (&b.timestamp, b.file_mtime).cmp(&(&a.timestamp, a.file_mtime))
        });
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }

    async fn pick_directory(&self) -> Option<PathBuf> {
        for dir in &self.dirs {
            if let Ok(meta) = tokio::fs::metadata(dir).await {
                if meta.is_dir() {
                    return Some(dir.clone());
                }
            }
        }
        None
    }
}

/// Read the trailing `limit` non-empty lines of one file, preserving true
/// 1-based line numbers.
async fn tail_log_file(path: &Path, limit: Option<usize>) -> Vec<PackageLogEntry> {
    let Ok(meta) = tokio::fs::metadata(path).await else {
        return Vec::new();
    };
    let mtime = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let content = match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "package log unreadable");
            return Vec::new();
        }
    };

    let numbered: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let start = limit.map_or(0, |n| numbered.len().saturating_sub(n));

    numbered[start..]
        .iter()
        .map(|(line_number, line)| {
            let (timestamp, message) = split_timestamp(line, mtime);
            PackageLogEntry {
                timestamp,
                message,
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                file_path: path.display().to_string(),
                line_number: *line_number,
                file_mtime: mtime,
                log_type: "package".to_string(),
            }
        })
        .collect()
}

/// Extract a leading timestamp from a log line.
///
/// Recognizes a leading bracketed form (`[2025-10-30 21:14:02] msg`) and the
/// bare delimited form (`2025-10-30 21:14:02: msg` — a pre-colon prefix long
/// enough to be a date). Anything else falls back to the file mtime.
fn split_timestamp(line: &str, mtime: DateTime<Utc>) -> (String, String) {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some(close) = rest.find(']') {
            let ts = rest[..close].trim();
            if !ts.is_empty() {
                return (ts.to_string(), rest[close + 1..].trim().to_string());
            }
        }
    }

    if let Some(caps) = LEADING_TS_RE.captures(line) {
        return (caps[1].trim().to_string(), caps[2].trim().to_string());
    }

    (mtime.to_rfc3339(), line.to_string())
}
