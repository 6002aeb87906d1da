//! The `log show` collaborator boundary.
//!
//! The core never owns subprocess policy beyond this seam: it hands over a
//! resolved window, an optional predicate, and an execution budget, and gets
//! back raw text or a `RunnerError`. The real implementation runs the
//! unified logging utility as a scoped child process; tests swap in
//! [`crate::mock::MockLogRunner`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{RunnerError, RunnerResult};
use crate::window::TimeWindow;

/// Upper bound on accepted utility output (8 MB). `log show` over a long
/// window can produce much more; everything past the cap is discarded.
const MAX_OUTPUT_BYTES: usize = 8 * 1024 * 1024;

/// Abstraction over the unified-log query utility.
#[async_trait]
pub trait LogShowRunner: Send + Sync {
    /// Fetch raw syslog-style text for the given window and predicate,
    /// bounded by `budget`.
    async fn show(
        &self,
        window: &TimeWindow,
        predicate: Option<&str>,
        budget: Duration,
    ) -> RunnerResult<String>;
}

/// Runs the real `log show` binary.
#[derive(Debug, Clone, Default)]
pub struct SystemLogRunner;

#[async_trait]
impl LogShowRunner for SystemLogRunner {
    async fn show(
        &self,
        window: &TimeWindow,
        predicate: Option<&str>,
        budget: Duration,
    ) -> RunnerResult<String> {
        let mut cmd = Command::new("log");
        cmd.arg("show")
            .arg("--style")
            .arg("syslog")
            .arg("--last")
            .arg(&window.token);
        if let Some(predicate) = predicate.filter(|p| !p.trim().is_empty()) {
            cmd.arg("--predicate").arg(predicate);
        }
        // Dropping the in-flight future (timeout or caller cancellation)
        // must not leak a running child.
        cmd.kill_on_drop(true);

        tracing::debug!(last = %window.token, ?predicate, "invoking log show");

        let output = match tokio::time::timeout(budget, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(RunnerError::Unavailable(err.to_string())),
            Err(_) => return Err(RunnerError::TimedOut(budget)),
        };

        if !output.status.success() {
            return Err(RunnerError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = if output.stdout.len() > MAX_OUTPUT_BYTES {
            &output.stdout[..MAX_OUTPUT_BYTES]
        } else {
            &output.stdout
        };
        Ok(String::from_utf8_lossy(stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Integration test: runs the real utility. Only passes on macOS.
    #[tokio::test]
    #[ignore] // Requires macOS `log` — run with `cargo test -- --ignored`
    async fn live_log_show_query() {
        let runner = SystemLogRunner;
        let window = TimeWindow::resolve(Some("1m"), None);
        let raw = runner
            .show(&window, None, Duration::from_secs(30))
            .await
            .unwrap();
        assert!(!raw.is_empty());
    }
}
