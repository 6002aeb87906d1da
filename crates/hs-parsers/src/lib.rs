//! Log normalization core for Hindsight.
//!
//! Turns the three wildly different log families of a macOS host — `log show`
//! text output, DiagnosticReports crash files (`.ips` / `.crash`), and
//! Homebrew's line-oriented logs — into the uniform record shapes defined in
//! `hs-protocol`. Parsing is best-effort throughout: individual lines and
//! files degrade to placeholder fields or get dropped with a diagnostic
//! counter, and only external-tool failures surface as errors.

pub mod classify;
pub mod crash;
pub mod error;
pub mod mock;
pub mod package;
pub mod query;
pub mod runner;
pub mod unified;
pub mod window;

// Re-export key types for convenience
pub use classify::KeywordSet;
pub use error::{RunnerError, RunnerResult};
pub use mock::MockLogRunner;
pub use query::QueryOrchestrator;
pub use runner::{LogShowRunner, SystemLogRunner};
pub use window::TimeWindow;
