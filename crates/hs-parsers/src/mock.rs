//! Mock `log show` runner for testing — serves canned output or failures
//! and records every invocation it sees.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::LogShowRunner;
use crate::window::TimeWindow;

/// One recorded `show` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub token: String,
    pub predicate: Option<String>,
    pub budget: Duration,
}

enum Canned {
    Output(String),
    Unavailable(String),
    Failed { code: i32, stderr: String },
    TimedOut,
}

/// A mock runner that replays a canned response.
pub struct MockLogRunner {
    response: Canned,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLogRunner {
    /// Succeed with the given raw text.
    pub fn with_output(raw: impl Into<String>) -> Self {
        Self {
            response: Canned::Output(raw.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Succeed with a small realistic syslog-style sample.
    pub fn with_system_sample() -> Self {
        Self::with_output(
            "\
2025-11-01 16:45:29.904939+0200 localhost kernel[0]: <Error>: disk full
2025-11-01 16:45:30.104939+0200 localhost loginwindow[312]: <Notice>: session opened for user
2025-11-01 16:45:31.204939+0200 localhost kernel[0]: <Notice>: USB device attached
2025-11-01 16:45:32.304939+0200 localhost backupd[77]: starting backup
  copying /Users/demo/Documents
2025-11-01 16:45:33.404939+0200 localhost sudo[991]: <Notice>: command run by demo
",
        )
    }

    /// Fail as if the binary could not be spawned.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            response: Canned::Unavailable(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail with a non-zero exit.
    pub fn failing(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            response: Canned::Failed {
                code,
                stderr: stderr.into(),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail as if the budget was exceeded.
    pub fn timing_out() -> Self {
        Self {
            response: Canned::TimedOut,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Invocations seen so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LogShowRunner for MockLogRunner {
    async fn show(
        &self,
        window: &TimeWindow,
        predicate: Option<&str>,
        budget: Duration,
    ) -> RunnerResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                token: window.token.clone(),
                predicate: predicate.map(str::to_string),
                budget,
            });
        }
        match &self.response {
            Canned::Output(raw) => Ok(raw.clone()),
            Canned::Unavailable(msg) => Err(RunnerError::Unavailable(msg.clone())),
            Canned::Failed { code, stderr } => Err(RunnerError::Failed {
                code: *code,
                stderr: stderr.clone(),
            }),
            Canned::TimedOut => Err(RunnerError::TimedOut(budget)),
        }
    }
}
