//! In-memory TaskSource implementation for unit tests

use async_trait::async_trait;
use reporter_domain::{TaskRecord, TaskSource};
use reporter_errors::{ReporterError, ReporterResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock implementation of TaskSource for testing
#[derive(Debug, Clone, Default)]
pub struct MockTaskSource {
    tasks: Arc<Mutex<Vec<TaskRecord>>>,
    logs: Arc<Mutex<HashMap<String, String>>>,
    log_delays: Arc<Mutex<HashMap<String, Duration>>>,
    failing_logs: Arc<Mutex<Vec<String>>>,
    fail_listing: Arc<Mutex<bool>>,
    log_requests: Arc<Mutex<Vec<String>>>,
}

impl MockTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        let source = Self::new();
        *source.tasks.lock().unwrap() = tasks;
        source
    }

    pub fn with_log(self, task_id: &str, log: &str) -> Self {
        self.logs
            .lock()
            .unwrap()
            .insert(task_id.to_string(), log.to_string());
        self
    }

    /// 让指定任务的日志请求延迟返回，用于验证并发时的输出顺序
    pub fn with_log_delay(self, task_id: &str, delay: Duration) -> Self {
        self.log_delays
            .lock()
            .unwrap()
            .insert(task_id.to_string(), delay);
        self
    }

    pub fn with_failing_log(self, task_id: &str) -> Self {
        self.failing_logs.lock().unwrap().push(task_id.to_string());
        self
    }

    pub fn with_failing_listing(self) -> Self {
        *self.fail_listing.lock().unwrap() = true;
        self
    }

    /// 按请求顺序记录的任务ID
    pub fn log_requests(&self) -> Vec<String> {
        self.log_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn fetch_tasks(&self) -> ReporterResult<Vec<TaskRecord>> {
        if *self.fail_listing.lock().unwrap() {
            return Err(ReporterError::network("connection refused"));
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn fetch_task_log(&self, task: &TaskRecord) -> ReporterResult<String> {
        self.log_requests.lock().unwrap().push(task.id.clone());

        let delay = self.log_delays.lock().unwrap().get(&task.id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_logs.lock().unwrap().contains(&task.id) {
            return Err(ReporterError::HttpStatus {
                url: format!("/qrs/ReloadTask/{}/scriptlog", task.id),
                status: 500,
            });
        }

        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(&task.id)
            .cloned()
            .unwrap_or_default())
    }
}
