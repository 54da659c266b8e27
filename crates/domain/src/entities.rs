use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// QRS任务最近一次执行的状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ExecutionStatus {
    NeverStarted,
    Triggered,
    Started,
    Queued,
    AbortInitiated,
    Aborting,
    Aborted,
    FinishedSuccess,
    FinishedFail,
    Skipped,
    Retry,
    Error,
    Reset,
    Unknown(i32),
}

impl ExecutionStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionStatus::FinishedFail)
    }
}

impl From<i32> for ExecutionStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExecutionStatus::NeverStarted,
            1 => ExecutionStatus::Triggered,
            2 => ExecutionStatus::Started,
            3 => ExecutionStatus::Queued,
            4 => ExecutionStatus::AbortInitiated,
            5 => ExecutionStatus::Aborting,
            6 => ExecutionStatus::Aborted,
            7 => ExecutionStatus::FinishedSuccess,
            8 => ExecutionStatus::FinishedFail,
            9 => ExecutionStatus::Skipped,
            10 => ExecutionStatus::Retry,
            11 => ExecutionStatus::Error,
            12 => ExecutionStatus::Reset,
            other => ExecutionStatus::Unknown(other),
        }
    }
}

impl From<ExecutionStatus> for i32 {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::NeverStarted => 0,
            ExecutionStatus::Triggered => 1,
            ExecutionStatus::Started => 2,
            ExecutionStatus::Queued => 3,
            ExecutionStatus::AbortInitiated => 4,
            ExecutionStatus::Aborting => 5,
            ExecutionStatus::Aborted => 6,
            ExecutionStatus::FinishedSuccess => 7,
            ExecutionStatus::FinishedFail => 8,
            ExecutionStatus::Skipped => 9,
            ExecutionStatus::Retry => 10,
            ExecutionStatus::Error => 11,
            ExecutionStatus::Reset => 12,
            ExecutionStatus::Unknown(code) => code,
        }
    }
}

/// QRS `task/full` 返回的一条任务记录，只保留失败报告需要的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecordWire", into = "TaskRecordWire")]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    /// 最近一次执行结果的ID
    pub execution_result_id: String,
    pub last_execution_status: ExecutionStatus,
    pub last_execution_start: DateTime<Utc>,
    /// 执行未结束时为零值时间
    pub last_execution_stop: DateTime<Utc>,
    pub log_file_reference_id: String,
}

impl TaskRecord {
    pub fn is_failed(&self) -> bool {
        self.last_execution_status.is_failed()
    }

    pub fn has_log_reference(&self) -> bool {
        !self.log_file_reference_id.trim().is_empty()
    }
}

// QRS接口的嵌套JSON结构，未使用的字段直接忽略
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecordWire {
    id: String,
    #[serde(default)]
    name: String,
    operational: OperationalWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationalWire {
    last_execution_result: ExecutionResultWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionResultWire {
    #[serde(default)]
    id: String,
    status: ExecutionStatus,
    start_time: DateTime<Utc>,
    // 执行中的任务可能没有结束时间
    #[serde(default)]
    stop_time: DateTime<Utc>,
    #[serde(rename = "fileReferenceID", default)]
    file_reference_id: String,
}

impl From<TaskRecordWire> for TaskRecord {
    fn from(wire: TaskRecordWire) -> Self {
        let result = wire.operational.last_execution_result;
        Self {
            id: wire.id,
            name: wire.name,
            execution_result_id: result.id,
            last_execution_status: result.status,
            last_execution_start: result.start_time,
            last_execution_stop: result.stop_time,
            log_file_reference_id: result.file_reference_id,
        }
    }
}

impl From<TaskRecord> for TaskRecordWire {
    fn from(task: TaskRecord) -> Self {
        Self {
            id: task.id,
            name: task.name,
            operational: OperationalWire {
                last_execution_result: ExecutionResultWire {
                    id: task.execution_result_id,
                    status: task.last_execution_status,
                    start_time: task.last_execution_start,
                    stop_time: task.last_execution_stop,
                    file_reference_id: task.log_file_reference_id,
                },
            },
        }
    }
}

/// 下载日志用的一次性令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAccessToken {
    pub value: String,
}

/// 一条失败任务报告，对应CSV中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct FailedTaskRecord {
    pub id: String,
    pub task_id: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub date_recorded: DateTime<Local>,
    pub name: String,
    pub error_message: String,
}

impl FailedTaskRecord {
    pub fn from_task(
        task: &TaskRecord,
        error_message: String,
        date_recorded: DateTime<Local>,
    ) -> Self {
        Self {
            id: task.execution_result_id.clone(),
            task_id: task.id.clone(),
            start: task.last_execution_start,
            stop: task.last_execution_stop,
            date_recorded,
            name: task.name.clone(),
            error_message,
        }
    }
}
