//! Log source taxonomy and per-source query knobs.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Logical category of logs a query targets.
///
/// Seven sources are backed by the unified logging system (`log show`);
/// `Crashes` and `Packages` read on-disk report/log directories instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    System,
    Kernel,
    Auth,
    Hardware,
    Power,
    Scheduler,
    Boot,
    Crashes,
    Packages,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Kernel => "kernel",
            Self::Auth => "auth",
            Self::Hardware => "hardware",
            Self::Power => "power",
            Self::Scheduler => "scheduler",
            Self::Boot => "boot",
            Self::Crashes => "crashes",
            Self::Packages => "packages",
        }
    }

    /// True for sources answered by querying the unified logging system.
    pub fn is_unified(&self) -> bool {
        !matches!(self, Self::Crashes | Self::Packages)
    }

    /// Predicate passed to `log show` for this source, if any.
    ///
    /// `Auth` and `Hardware` are derived sources: they reuse the system and
    /// kernel feeds respectively and are narrowed by keyword classification
    /// after parsing, not by a predicate of their own.
    pub fn predicate(&self) -> Option<&'static str> {
        match self {
            Self::Kernel | Self::Hardware => Some(r#"process == "kernel""#),
            Self::Power => Some(r#"subsystem contains "power""#),
            Self::Scheduler => Some(r#"process == "launchd""#),
            Self::Boot => Some(r#"eventMessage contains "boot""#),
            Self::System | Self::Auth | Self::Crashes | Self::Packages => None,
        }
    }

    /// Hard ceiling on the resolved lookback window.
    ///
    /// Boot queries use a `contains` predicate that gets very slow over long
    /// ranges, so their window is clamped regardless of the requested token.
    pub fn window_cap(&self) -> Option<Duration> {
        match self {
            Self::Boot => Some(Duration::from_secs(3600)),
            _ => None,
        }
    }

    /// Execution budget for the external `log show` invocation.
    ///
    /// Boot gets a larger allowance in exchange for the capped window.
    pub fn command_budget(&self) -> Duration {
        match self {
            Self::Boot => Duration::from_secs(60),
            _ => Duration::from_secs(30),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized source names in path or query parameters.
#[derive(Debug, thiserror::Error)]
#[error("unknown log source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for SourceType {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "kernel" => Ok(Self::Kernel),
            "auth" => Ok(Self::Auth),
            "hardware" => Ok(Self::Hardware),
            "power" => Ok(Self::Power),
            "scheduler" => Ok(Self::Scheduler),
            "boot" => Ok(Self::Boot),
            "crashes" => Ok(Self::Crashes),
            "packages" => Ok(Self::Packages),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for s in [
            "system",
            "kernel",
            "auth",
            "hardware",
            "power",
            "scheduler",
            "boot",
            "crashes",
            "packages",
        ] {
            let parsed: SourceType = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!("syslog".parse::<SourceType>().is_err());
        assert!("".parse::<SourceType>().is_err());
    }

    #[test]
    fn derived_sources_reuse_base_predicates() {
        assert_eq!(SourceType::Hardware.predicate(), SourceType::Kernel.predicate());
        assert_eq!(SourceType::Auth.predicate(), None);
    }

    #[test]
    fn only_boot_is_window_capped() {
        assert_eq!(SourceType::Boot.window_cap(), Some(Duration::from_secs(3600)));
        assert_eq!(SourceType::System.window_cap(), None);
        assert_eq!(SourceType::Kernel.window_cap(), None);
    }

    #[test]
    fn boot_budget_exceeds_default() {
        assert!(SourceType::Boot.command_budget() > SourceType::System.command_budget());
    }

    #[test]
    fn directory_sources_are_not_unified() {
        assert!(!SourceType::Crashes.is_unified());
        assert!(!SourceType::Packages.is_unified());
        assert!(SourceType::Boot.is_unified());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&SourceType::Scheduler).unwrap();
        assert_eq!(json, "\"scheduler\"");
    }
}
