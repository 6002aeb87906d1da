//! Keyword-based sub-classification of normalized entries.
//!
//! The derived sources (hardware, auth) and any power filtering are plain
//! post-filters over an already-parsed feed: retain entries whose message or
//! process mentions one of a fixed keyword set, case-insensitively.

use hs_protocol::{NormalizedEntry, SourceType};

/// Hardware-related terms scanned for in kernel output.
pub const HARDWARE_KEYWORDS: &[&str] = &[
    "usb",
    "storage",
    "disk",
    "device",
    "iokit",
    "hardware",
    "pci",
    "sata",
    "thunderbolt",
];

/// Power-management terms.
pub const POWER_KEYWORDS: &[&str] = &[
    "power",
    "battery",
    "sleep",
    "wake",
    "charging",
    "thermal",
];

/// Authentication terms scanned for in the system feed.
pub const AUTH_KEYWORDS: &[&str] = &[
    "loginwindow",
    "login",
    "sudo",
    "auth",
    "password",
    "session",
];

/// Named, immutable keyword configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSet {
    Hardware,
    Power,
    Auth,
}

impl KeywordSet {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Hardware => HARDWARE_KEYWORDS,
            Self::Power => POWER_KEYWORDS,
            Self::Auth => AUTH_KEYWORDS,
        }
    }

    /// Keyword set a derived source is narrowed by, if any.
    pub fn for_source(source: SourceType) -> Option<Self> {
        match source {
            SourceType::Hardware => Some(Self::Hardware),
            SourceType::Auth => Some(Self::Auth),
            _ => None,
        }
    }
}

/// Retain the entries whose `message` or `process` contains any keyword,
/// case-insensitively. Single pass, stable order. An empty keyword slice
/// matches nothing — classification is opt-in filtering, never a
/// pass-through.
pub fn classify(entries: Vec<NormalizedEntry>, keywords: &[&str]) -> Vec<NormalizedEntry> {
    if keywords.is_empty() {
        return Vec::new();
    }
    entries
        .into_iter()
        .filter(|entry| {
            let message = entry.message.to_lowercase();
            let process = entry.process.to_lowercase();
            keywords
                .iter()
                .any(|kw| message.contains(&kw.to_lowercase()) || process.contains(&kw.to_lowercase()))
        })
        .collect()
}
