//! Parser for `log show --style syslog` text output.
//!
//! The output is line-oriented but not one-event-per-line: an event's
//! message may wrap onto following lines (stack traces, multi-line payloads).
//! The parse is an explicit fold over lines carrying the currently open
//! entry: a line starting with a full timestamp opens a new entry, anything
//! else is folded into the open one. A continuation with no open entry (the
//! utility's column-header line, banner text) is dropped and counted, never
//! an error.

use std::sync::LazyLock;

use regex::Regex;

use hs_protocol::NormalizedEntry;

// Primary lines start with: date, time with fractional seconds, UTC offset.
// 2025-11-01 16:45:29.904939+0200 ...
static PRIMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:\.\d+)?[+-]\d{4})\s+(.*)$")
        .unwrap()
});

/// Outcome of one parse: ordered entries plus recovery diagnostics.
#[derive(Debug, Default)]
pub struct UnifiedParse {
    pub entries: Vec<NormalizedEntry>,
    /// Continuation lines that had no preceding primary entry to attach to.
    pub dropped_lines: usize,
}

/// Parse one invocation's raw output into ordered entries.
///
/// `log_type` is supplied by the caller per source; it is never inferred
/// from content. This function does not fail — malformed input degrades
/// field by field.
pub fn parse_unified(raw: &str, log_type: &str) -> UnifiedParse {
    let mut entries = Vec::new();
    let mut open: Option<NormalizedEntry> = None;
    let mut dropped = 0usize;

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match PRIMARY_RE.captures(line) {
            Some(caps) => {
                if let Some(done) = open.take() {
                    entries.push(done);
                }
                let timestamp = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                open = Some(parse_primary(timestamp, rest, log_type, line));
            }
            None => match open.as_mut() {
                Some(entry) => {
                    entry.message.push('\n');
                    entry.message.push_str(line);
                    entry.raw.push('\n');
                    entry.raw.push_str(line);
                }
                None => dropped += 1,
            },
        }
    }
    if let Some(done) = open.take() {
        entries.push(done);
    }

    if dropped > 0 {
        tracing::debug!(dropped, log_type, "dropped unattributable log lines");
    }

    UnifiedParse {
        entries,
        dropped_lines: dropped,
    }
}

/// Best-effort field extraction from the text after the timestamp:
/// `hostname process[pid]: <Level>: message`, every part optional.
fn parse_primary(timestamp: &str, rest: &str, log_type: &str, line: &str) -> NormalizedEntry {
    let (hostname, process, pid, body) = split_process_marker(rest);
    let (level, message) = extract_level(body);

    NormalizedEntry {
        timestamp: timestamp.trim().to_string(),
        hostname,
        process,
        pid,
        level,
        message,
        log_type: log_type.to_string(),
        raw: line.to_string(),
    }
}

/// Locate the `process[pid]:` marker. Tokens before it are descriptive
/// fields with the hostname first and the process name last; a missing
/// marker leaves process and pid at `"Unknown"`.
///
/// A bracket pair only counts as the marker when a `:` follows the `]` —
/// bracketed text inside a free-form message (`[50%]`, `[cached]`) does not
/// qualify.
fn split_process_marker(rest: &str) -> (String, String, String, &str) {
    for (bracket_end, _) in rest.match_indices(']') {
        if !rest[bracket_end + 1..].trim_start().starts_with(':') {
            continue;
        }
        let Some(bracket_start) = rest[..bracket_end].rfind('[') else {
            continue;
        };
        let head: Vec<&str> = rest[..bracket_start].split_whitespace().collect();
        let (hostname, process) = match head.as_slice() {
            [] => ("localhost".to_string(), "Unknown".to_string()),
            [only] => ("localhost".to_string(), (*only).to_string()),
            [host, .., proc] => ((*host).to_string(), (*proc).to_string()),
        };
        let pid = rest[bracket_start + 1..bracket_end].to_string();
        let body = rest[bracket_end + 1..]
            .trim_start()
            .trim_start_matches(':')
            .trim_start();
        return (hostname, process, pid, body);
    }
    (
        "localhost".to_string(),
        "Unknown".to_string(),
        "Unknown".to_string(),
        rest,
    )
}

/// Strip a leading `<Level>` severity marker out of the message body.
fn extract_level(body: &str) -> (String, String) {
    let body = body.trim();
    if let Some(after) = body.strip_prefix('<') {
        if let Some(close) = after.find('>') {
            let level = &after[..close];
            if !level.is_empty() && close <= 16 && !level.contains(char::is_whitespace) {
                let message = after[close + 1..]
                    .trim_start()
                    .trim_start_matches(':')
                    .trim();
                return (level.to_string(), message.to_string());
            }
        }
    }
    ("Unknown".to_string(), body.to_string())
}
