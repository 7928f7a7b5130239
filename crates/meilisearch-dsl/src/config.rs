//! Settings for filter rendering and task polling.
//!
//! # Example
//!
//! ```
//! use meilisearch_dsl::DslConfig;
//!
//! let config = DslConfig::default();
//! assert_eq!(config.max_filter_depth, 2);
//!
//! let config: DslConfig = serde_json::from_str(r#"{ "max_filter_depth": 3 }"#).unwrap();
//! assert_eq!(config.max_filter_depth, 3);
//! assert_eq!(config.task_timeout_ms, 10_000);
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Crate-wide settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DslConfig {
    /// Deepest combinator nesting the engine accepts in structured filters.
    #[serde(default = "default_max_filter_depth")]
    pub max_filter_depth: usize,

    /// How long to wait for an indexing task before giving up.
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,

    /// Pause between two task status checks.
    #[serde(default = "default_task_poll_interval_ms")]
    pub task_poll_interval_ms: u64,
}

fn default_max_filter_depth() -> usize {
    2
}
fn default_task_timeout_ms() -> u64 {
    10_000
}
fn default_task_poll_interval_ms() -> u64 {
    500
}

impl Default for DslConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: default_max_filter_depth(),
            task_timeout_ms: default_task_timeout_ms(),
            task_poll_interval_ms: default_task_poll_interval_ms(),
        }
    }
}

impl DslConfig {
    /// Polling settings for [`crate::wait_for_task`].
    pub fn task_wait(&self) -> TaskWaitConfig {
        TaskWaitConfig {
            timeout: Duration::from_millis(self.task_timeout_ms),
            poll_interval: Duration::from_millis(self.task_poll_interval_ms),
        }
    }
}

/// Bounds for waiting on an asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for TaskWaitConfig {
    fn default() -> Self {
        DslConfig::default().task_wait()
    }
}

impl TaskWaitConfig {
    /// Upper bound on status checks: one up front plus one per interval.
    pub fn max_polls(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        (self.timeout.as_millis() / interval) as u64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DslConfig::default();
        assert_eq!(config.max_filter_depth, 2);
        assert_eq!(config.task_timeout_ms, 10_000);
        assert_eq!(config.task_poll_interval_ms, 500);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: DslConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DslConfig::default());
    }

    #[test]
    fn task_wait_conversion() {
        let wait = DslConfig::default().task_wait();
        assert_eq!(wait.timeout, Duration::from_secs(10));
        assert_eq!(wait.poll_interval, Duration::from_millis(500));
        assert_eq!(wait.max_polls(), 21);
    }

    #[test]
    fn zero_interval_does_not_divide_by_zero() {
        let wait = TaskWaitConfig {
            timeout: Duration::from_millis(3),
            poll_interval: Duration::ZERO,
        };
        assert_eq!(wait.max_polls(), 4);
    }
}
