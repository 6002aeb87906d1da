//! Query parameters and the response envelope.

use serde::{Deserialize, Serialize};

use crate::entry::LogRecord;
use crate::source::SourceType;

/// A single log query as received from the API surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub source: SourceType,
    /// Lookback token (`"1h"`, `"24h"`, `"7d"`, ...). Absent or
    /// unparseable tokens resolve to the per-source default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    /// Maximum entries to return; absent means all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl QueryRequest {
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            time_period: None,
            limit: None,
        }
    }

    pub fn with_time_period(mut self, token: impl Into<String>) -> Self {
        self.time_period = Some(token.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Terminal outcome of a query.
///
/// Serializes to `{"status":"success", "log_type", "count", "logs":[...]}`
/// or `{"status":"error", "message"}` — per-line and per-file parse
/// failures never reach this envelope, only external-tool failures do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryResponse {
    Success {
        log_type: String,
        count: usize,
        logs: Vec<LogRecord>,
    },
    Error {
        message: String,
    },
}

impl QueryResponse {
    pub fn success(source: SourceType, logs: Vec<LogRecord>) -> Self {
        Self::Success {
            log_type: source.as_str().to_string(),
            count: logs.len(),
            logs,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
