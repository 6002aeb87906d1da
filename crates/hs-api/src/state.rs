//! Shared application state for the Axum server.

use std::sync::Arc;

use hs_parsers::crash::CrashReportScanner;
use hs_parsers::package::PackageLogScanner;
use hs_parsers::{LogShowRunner, QueryOrchestrator, SystemLogRunner};

use crate::config::ApiConfig;

/// Shared application state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<QueryOrchestrator>,
    /// Kept separately so the health probe can touch the collaborator
    /// directly without going through a full query.
    pub runner: Arc<dyn LogShowRunner>,
}

impl AppState {
    /// State over an arbitrary runner — tests inject a mock here.
    pub fn new(runner: Arc<dyn LogShowRunner>, config: &ApiConfig) -> Self {
        let crashes = match &config.crash_dirs {
            Some(dirs) => CrashReportScanner::new(dirs.clone()),
            None => CrashReportScanner::default_locations(),
        };
        let packages = match &config.package_dirs {
            Some(dirs) => PackageLogScanner::new(dirs.clone()),
            None => PackageLogScanner::default_locations(),
        };
        Self {
            orchestrator: Arc::new(QueryOrchestrator::new(runner.clone(), crashes, packages)),
            runner,
        }
    }

    /// Production state over the real `log show` binary.
    pub fn with_system_runner(config: &ApiConfig) -> Self {
        Self::new(Arc::new(SystemLogRunner), config)
    }
}
