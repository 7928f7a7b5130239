//! Boundary to the search service.
//!
//! The crate does not talk to the network. [`SearchService`] describes what
//! it needs from a client (search, multi-search, task lookup); [`Index`]
//! binds an index uid to a caller-owned service and feeds rendered filters
//! and requests into it.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TaskWaitConfig;
use crate::error::DslError;
use crate::query::Q;
use crate::search::{IndexSearch, SearchRequest};

/// Operations the DSL needs from a search-service client.
pub trait SearchService {
    /// The client's own failure type.
    type Error;

    /// Searches one index. `params` holds the rendered `filter` and any
    /// extra search options, keyed as the engine expects them.
    fn search(
        &self,
        index_uid: &str,
        query: &str,
        params: &Map<String, Value>,
    ) -> Result<Value, Self::Error>;

    /// Runs several independent searches in one round trip.
    fn multi_search(&self, requests: &[SearchRequest]) -> Result<Vec<Value>, Self::Error>;

    /// Looks up an asynchronous task.
    fn task(&self, task_uid: u64) -> Result<TaskInfo, Self::Error>;
}

/// Failure of an operation that renders and then calls the service.
#[derive(Debug, Error)]
pub enum ServiceError<E> {
    #[error(transparent)]
    Dsl(#[from] DslError),

    #[error("search service error: {0}")]
    Service(E),
}

/// Lifecycle state of an asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled
        )
    }
}

/// The parts of a task record the DSL looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub uid: u64,
    pub status: TaskStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// How waiting on a task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Succeeded(TaskInfo),
    /// The task failed or was canceled.
    Failed(TaskInfo),
    TimedOut { task_uid: u64, waited: Duration },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded(_))
    }
}

/// Polls a task until it reaches a terminal state or the wait budget runs out.
///
/// Blocks the calling thread between polls. Service errors are returned as
/// they are; a timeout is an outcome, not an error.
pub fn wait_for_task<S: SearchService>(
    service: &S,
    task_uid: u64,
    config: &TaskWaitConfig,
) -> Result<TaskOutcome, S::Error> {
    let started = Instant::now();
    let max_polls = config.max_polls();

    for attempt in 1..=max_polls {
        let task = service.task(task_uid)?;
        debug!(task_uid, attempt, status = ?task.status, "polled task");
        match task.status {
            TaskStatus::Succeeded => return Ok(TaskOutcome::Succeeded(task)),
            TaskStatus::Failed | TaskStatus::Canceled => {
                warn!(task_uid, status = ?task.status, error = ?task.error, "task did not succeed");
                return Ok(TaskOutcome::Failed(task));
            }
            TaskStatus::Enqueued | TaskStatus::Processing => {}
        }
        if attempt < max_polls {
            thread::sleep(config.poll_interval);
        }
    }

    let waited = started.elapsed();
    warn!(task_uid, waited_ms = waited.as_millis() as u64, "timed out waiting for task");
    Ok(TaskOutcome::TimedOut { task_uid, waited })
}

/// Renders every search and submits them as one multi-search batch.
///
/// Nothing is sent if any request fails to render.
pub fn multi_search<S: SearchService>(
    service: &S,
    searches: &[IndexSearch],
) -> Result<Vec<Value>, ServiceError<S::Error>> {
    let requests = searches
        .iter()
        .map(IndexSearch::query)
        .collect::<Result<Vec<_>, DslError>>()?;
    debug!(count = requests.len(), "submitting multi-search");
    service
        .multi_search(&requests)
        .map_err(ServiceError::Service)
}

/// An index uid bound to a search service.
#[derive(Debug)]
pub struct Index<'a, S> {
    uid: String,
    service: &'a S,
}

impl<'a, S: SearchService> Index<'a, S> {
    pub fn new(service: &'a S, uid: impl Into<String>) -> Self {
        Index {
            uid: uid.into(),
            service,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Searches this index.
    ///
    /// The filter is rendered under the `filter` key; entries of `options`
    /// are added on top and win on conflict.
    pub fn search(
        &self,
        query: &str,
        filter: Option<&Q>,
        options: Option<Map<String, Value>>,
    ) -> Result<Value, ServiceError<S::Error>> {
        let mut params = Map::new();
        if let Some(filter) = filter {
            params.insert("filter".to_string(), Value::String(filter.render()?));
        }
        if let Some(options) = options {
            params.extend(options);
        }
        debug!(index = %self.uid, query, "searching index");
        self.service
            .search(&self.uid, query, &params)
            .map_err(ServiceError::Service)
    }

    /// See [`multi_search`].
    pub fn multi_search(&self, searches: &[IndexSearch]) -> Result<Vec<Value>, ServiceError<S::Error>> {
        multi_search(self.service, searches)
    }

    /// See [`wait_for_task`].
    pub fn wait_for_task(
        &self,
        task_uid: u64,
        config: &TaskWaitConfig,
    ) -> Result<TaskOutcome, S::Error> {
        wait_for_task(self.service, task_uid, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
        assert!(!TaskStatus::Enqueued.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
    }

    #[test]
    fn task_info_deserializes_from_engine_shape() {
        let task: TaskInfo = serde_json::from_str(
            r#"{ "uid": 7, "status": "failed", "type": "documentAdditionOrUpdate",
                 "error": { "code": "index_not_found" }, "duration": "PT0.1S" }"#,
        )
        .unwrap();
        assert_eq!(task.uid, 7);
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.kind.as_deref(), Some("documentAdditionOrUpdate"));
        assert!(task.error.is_some());
    }

    #[test]
    fn service_error_display() {
        let err: ServiceError<String> = ServiceError::Service("connection refused".into());
        assert_eq!(err.to_string(), "search service error: connection refused");

        let err: ServiceError<String> = DslError::UnknownOption("x".into()).into();
        assert_eq!(err.to_string(), "unknown search option 'x'");
    }
}
