//! Test data builders for creating test entities

use chrono::{DateTime, TimeZone, Utc};
use reporter_domain::{ExecutionStatus, TaskRecord};

/// Builder for creating test TaskRecord entities
pub struct TaskRecordBuilder {
    task: TaskRecord,
}

impl TaskRecordBuilder {
    pub fn new() -> Self {
        Self {
            task: TaskRecord {
                id: "task-1".to_string(),
                name: "Reload Sales".to_string(),
                execution_result_id: "result-1".to_string(),
                last_execution_status: ExecutionStatus::FinishedSuccess,
                last_execution_start: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                last_execution_stop: Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 0).unwrap(),
                log_file_reference_id: "file-1".to_string(),
            },
        }
    }

    /// 同时设置任务ID、执行结果ID和日志引用ID
    pub fn with_id(mut self, id: &str) -> Self {
        self.task.id = id.to_string();
        self.task.execution_result_id = format!("result-{id}");
        self.task.log_file_reference_id = format!("file-{id}");
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.task.name = name.to_string();
        self
    }

    pub fn with_status(mut self, status: ExecutionStatus) -> Self {
        self.task.last_execution_status = status;
        self
    }

    pub fn failed(self) -> Self {
        self.with_status(ExecutionStatus::FinishedFail)
    }

    pub fn with_log_reference(mut self, reference: &str) -> Self {
        self.task.log_file_reference_id = reference.to_string();
        self
    }

    pub fn with_execution_window(mut self, start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        self.task.last_execution_start = start;
        self.task.last_execution_stop = stop;
        self
    }

    pub fn build(self) -> TaskRecord {
        self.task
    }
}

impl Default for TaskRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 生成一段QRS风格的重载日志，`errors` 中的每一项占一行
pub fn reload_log(errors: &[&str]) -> String {
    let mut log = String::from("20240301T100000.000+0000 Execution started.\n");
    for (index, error) in errors.iter().enumerate() {
        log.push_str(&format!(
            "20240301T10000{}.000+0000 Error: {error}\n",
            index + 1
        ));
    }
    log.push_str("20240301T100009.000+0000 Execution finished.\n");
    log
}
