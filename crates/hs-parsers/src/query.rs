//! Query orchestration — the single entry point used by the API surface.
//!
//! Resolves the time window, drives the runner and the right parser for the
//! requested source, applies derived-source classification and limit
//! truncation, and wraps everything in the response envelope. Stateless:
//! each call is a self-contained batch, safe under arbitrary concurrency.

use std::sync::Arc;

use hs_protocol::{LogRecord, QueryRequest, QueryResponse, SourceType};

use crate::classify::{self, KeywordSet};
use crate::crash::CrashReportScanner;
use crate::package::PackageLogScanner;
use crate::runner::LogShowRunner;
use crate::unified;
use crate::window::TimeWindow;

pub struct QueryOrchestrator {
    runner: Arc<dyn LogShowRunner>,
    crashes: CrashReportScanner,
    packages: PackageLogScanner,
}

impl QueryOrchestrator {
    pub fn new(
        runner: Arc<dyn LogShowRunner>,
        crashes: CrashReportScanner,
        packages: PackageLogScanner,
    ) -> Self {
        Self {
            runner,
            crashes,
            packages,
        }
    }

    /// Orchestrator over the standard macOS locations.
    pub fn with_default_locations(runner: Arc<dyn LogShowRunner>) -> Self {
        Self::new(
            runner,
            CrashReportScanner::default_locations(),
            PackageLogScanner::default_locations(),
        )
    }

    /// Run one query to a terminal envelope.
    ///
    /// Only an external-tool failure produces the error envelope; directory
    /// sources degrade to an empty success, and per-line/per-file parse
    /// failures are recovered inside the parsers.
    pub async fn query(&self, req: &QueryRequest) -> QueryResponse {
        match req.source {
            SourceType::Crashes => {
                let logs = self.crashes.scan(req.limit).await;
                QueryResponse::success(req.source, collect(logs))
            }
            SourceType::Packages => {
                let logs = self.packages.scan(req.limit).await;
                QueryResponse::success(req.source, collect(logs))
            }
            _ => self.query_unified(req).await,
        }
    }

    async fn query_unified(&self, req: &QueryRequest) -> QueryResponse {
        let source = req.source;
        let window = TimeWindow::resolve(req.time_period.as_deref(), source.window_cap());

        let raw = match self
            .runner
            .show(&window, source.predicate(), source.command_budget())
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(source = %source, %err, "unified log query failed");
                return QueryResponse::error(err.to_string());
            }
        };

        let parsed = unified::parse_unified(&raw, source.as_str());
        let mut entries = parsed.entries;
        if let Some(set) = KeywordSet::for_source(source) {
            entries = classify::classify(entries, set.keywords());
        }
        if let Some(limit) = req.limit {
            entries.truncate(limit);
        }

        QueryResponse::success(source, collect(entries))
    }
}

fn collect<T: Into<LogRecord>>(items: Vec<T>) -> Vec<LogRecord> {
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLogRunner;
    use std::path::PathBuf;
    use std::time::Duration;

    fn orchestrator(runner: MockLogRunner) -> (Arc<MockLogRunner>, QueryOrchestrator) {
        let runner = Arc::new(runner);
        let orch = QueryOrchestrator::new(
            runner.clone(),
            CrashReportScanner::new(vec![PathBuf::from("/nonexistent/reports")]),
            PackageLogScanner::new(vec![PathBuf::from("/nonexistent/var/log")]),
        );
        (runner, orch)
    }

    fn success_logs(resp: &QueryResponse) -> &[LogRecord] {
        match resp {
            QueryResponse::Success { logs, .. } => logs,
            QueryResponse::Error { message } => panic!("unexpected error: {message}"),
        }
    }

    #[tokio::test]
    async fn system_query_parses_sample() {
        let (_, orch) = orchestrator(MockLogRunner::with_system_sample());
        let resp = orch.query(&QueryRequest::new(SourceType::System)).await;
        let logs = success_logs(&resp);
        assert_eq!(logs.len(), 5);
        let LogRecord::Unified(first) = &logs[0] else {
            panic!("expected unified entry");
        };
        assert_eq!(first.process, "kernel");
        assert_eq!(first.level, "Error");
        assert_eq!(first.log_type, "system");
    }

    #[tokio::test]
    async fn limit_takes_head_of_ordered_sequence() {
        let raw: String = (0..100)
            .map(|i| {
                format!("2025-11-01 10:{:02}:{:02}.000000+0000 mac app[1]: message {i}\n", i / 60, i % 60)
            })
            .collect();
        let (_, orch) = orchestrator(MockLogRunner::with_output(raw));
        let resp = orch
            .query(&QueryRequest::new(SourceType::System).with_limit(5))
            .await;
        let logs = success_logs(&resp);
        assert_eq!(logs.len(), 5);
        let LogRecord::Unified(first) = &logs[0] else {
            panic!("expected unified entry");
        };
        assert_eq!(first.message, "message 0");
    }

    #[tokio::test]
    async fn runner_failure_surfaces_as_error_envelope() {
        let (_, orch) = orchestrator(MockLogRunner::failing(64, "bad predicate"));
        let resp = orch.query(&QueryRequest::new(SourceType::Kernel)).await;
        match resp {
            QueryResponse::Error { message } => {
                assert!(message.contains("64"));
                assert!(message.contains("bad predicate"));
            }
            QueryResponse::Success { .. } => panic!("expected error envelope"),
        }
    }

    #[tokio::test]
    async fn runner_timeout_surfaces_as_error_envelope() {
        let (_, orch) = orchestrator(MockLogRunner::timing_out());
        let resp = orch.query(&QueryRequest::new(SourceType::Boot)).await;
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn hardware_is_kernel_feed_plus_keyword_filter() {
        let (runner, orch) = orchestrator(MockLogRunner::with_system_sample());
        let resp = orch.query(&QueryRequest::new(SourceType::Hardware)).await;
        let logs = success_logs(&resp);
        // The disk-full and USB lines survive the hardware keyword filter.
        assert_eq!(logs.len(), 2);
        for log in logs {
            let LogRecord::Unified(e) = log else {
                panic!("expected unified entry");
            };
            assert_eq!(e.log_type, "hardware");
        }

        let calls = runner.calls();
        assert_eq!(
            calls[0].predicate.as_deref(),
            Some(r#"process == "kernel""#)
        );
    }

    #[tokio::test]
    async fn auth_is_system_feed_plus_keyword_filter() {
        let (runner, orch) = orchestrator(MockLogRunner::with_system_sample());
        let resp = orch.query(&QueryRequest::new(SourceType::Auth)).await;
        let logs = success_logs(&resp);
        assert_eq!(logs.len(), 2);
        assert_eq!(runner.calls()[0].predicate, None);
    }

    #[tokio::test]
    async fn boot_window_is_clamped_with_larger_budget() {
        let (runner, orch) = orchestrator(MockLogRunner::with_output(""));
        let req = QueryRequest::new(SourceType::Boot).with_time_period("7d");
        let resp = orch.query(&req).await;
        assert!(resp.is_success());

        let calls = runner.calls();
        assert_eq!(calls[0].token, "1h");
        assert_eq!(calls[0].budget, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn requested_window_reaches_the_runner() {
        let (runner, orch) = orchestrator(MockLogRunner::with_output(""));
        let req = QueryRequest::new(SourceType::System).with_time_period("24h");
        orch.query(&req).await;
        assert_eq!(runner.calls()[0].token, "24h");
    }

    #[tokio::test]
    async fn empty_crash_directory_is_a_successful_zero() {
        let (_, orch) = orchestrator(MockLogRunner::with_output(""));
        let resp = orch.query(&QueryRequest::new(SourceType::Crashes)).await;
        match resp {
            QueryResponse::Success { log_type, count, logs } => {
                assert_eq!(log_type, "crashes");
                assert_eq!(count, 0);
                assert!(logs.is_empty());
            }
            QueryResponse::Error { .. } => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn empty_package_directory_is_a_successful_zero() {
        let (_, orch) = orchestrator(MockLogRunner::with_output(""));
        let resp = orch.query(&QueryRequest::new(SourceType::Packages)).await;
        assert!(resp.is_success());
    }
}
