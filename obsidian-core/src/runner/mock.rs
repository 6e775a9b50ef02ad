//! Mock runner for testing
//!
//! Records every argument vector it is asked to run and answers from a
//! queue of canned outcomes, without starting any process.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{classify_exit, display_command, ProcessOutput, ProcessRunner, RunOptions};
use crate::error::{ToolError, ToolResult};
use crate::DEFAULT_BINARY;

/// Canned outcome for one call
#[derive(Debug, Clone)]
enum Canned {
    Exit(ProcessOutput),
    Timeout,
}

/// Mock runner that records calls
///
/// When the queue is empty, calls succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    /// Recorded argument vectors, vault token included
    calls: Mutex<Vec<Vec<String>>>,
    /// Outcomes to hand out, first in first out
    outcomes: Mutex<VecDeque<Canned>>,
}

impl MockRunner {
    /// Create a new mock runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a zero-exit run printing `stdout`
    pub fn push_ok(&self, stdout: impl Into<String>) {
        self.push(Canned::Exit(ProcessOutput::success(stdout)));
    }

    /// Queue a failing run
    pub fn push_exit(&self, exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) {
        self.push(Canned::Exit(ProcessOutput::failure(exit_code, stdout, stderr)));
    }

    /// Queue a run that never finishes in time
    pub fn push_timeout(&self) {
        self.push(Canned::Timeout);
    }

    /// All recorded argument vectors, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Count of recorded calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Clear recorded calls and pending outcomes
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.clear();
        }
    }

    fn push(&self, canned: Canned) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(canned);
        }
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run(&self, mut args: Vec<String>, options: &RunOptions) -> ToolResult<String> {
        options.apply_vault(&mut args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args.clone());
        }

        let next = self.outcomes.lock().ok().and_then(|mut o| o.pop_front());
        match next.unwrap_or(Canned::Exit(ProcessOutput::success(""))) {
            Canned::Exit(output) => classify_exit(output),
            Canned::Timeout => Err(ToolError::Timeout {
                timeout_ms: u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
                command: display_command(DEFAULT_BINARY, &args),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_records_calls_with_vault() {
        let mock = MockRunner::new();
        let options = RunOptions::default().with_vault(Some("Work".to_string()));

        mock.run(vec!["tags".to_string()], &options).await.unwrap();

        assert_eq!(mock.calls(), vec![vec!["tags", "vault=Work"]]);
    }

    #[tokio::test]
    async fn test_outcomes_are_fifo() {
        let mock = MockRunner::new();
        mock.push_ok("first\n");
        mock.push_exit(1, "", "second failed");

        let opts = RunOptions::default();
        assert_eq!(mock.run(vec!["a".to_string()], &opts).await.unwrap(), "first");
        let err = mock.run(vec!["b".to_string()], &opts).await.unwrap_err();
        assert_eq!(err.to_string(), "second failed");
        assert_eq!(mock.run(vec!["c".to_string()], &opts).await.unwrap(), "");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_timeout_outcome() {
        let mock = MockRunner::new();
        mock.push_timeout();

        let opts = RunOptions::default().with_timeout(Duration::from_secs(2));
        let err = mock.run(vec!["search".to_string()], &opts).await.unwrap_err();
        match err {
            ToolError::Timeout {
                timeout_ms,
                command,
            } => {
                assert_eq!(timeout_ms, 2000);
                assert_eq!(command, "obsidian search");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear() {
        let mock = MockRunner::new();
        mock.push_ok("x");
        mock.run(vec!["a".to_string()], &RunOptions::default()).await.unwrap();
        mock.clear();
        assert_eq!(mock.call_count(), 0);
    }
}
