use std::sync::Arc;

use chrono::Local;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use reporter_domain::{extract_error_message, FailedTaskRecord, TaskRecord, TaskSource};
use reporter_errors::ReporterResult;

/// 失败任务流水线 - 拉取任务列表，筛选失败任务并从日志中提取错误信息
pub struct FailedTaskPipeline {
    source: Arc<dyn TaskSource>,
    max_concurrent_log_fetches: usize,
}

impl FailedTaskPipeline {
    /// `max_concurrent_log_fetches` 为1时逐个拉取日志，小于1按1处理
    pub fn new(source: Arc<dyn TaskSource>, max_concurrent_log_fetches: usize) -> Self {
        Self {
            source,
            max_concurrent_log_fetches: max_concurrent_log_fetches.max(1),
        }
    }

    /// 保留最近一次执行失败的任务，顺序不变
    pub fn select_failed(tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
        tasks.into_iter().filter(TaskRecord::is_failed).collect()
    }

    /// 执行一次完整的报告流程，任一步骤失败则整体失败
    pub async fn run(&self) -> ReporterResult<Vec<FailedTaskRecord>> {
        let tasks = self.source.fetch_tasks().await?;
        let total = tasks.len();

        let failed = Self::select_failed(tasks);
        info!("任务筛选完成: 总计 {} 个，失败 {} 个", total, failed.len());

        // buffered 按输入顺序产出结果，并发只影响日志拉取
        let records: Vec<FailedTaskRecord> = stream::iter(failed)
            .map(|task| self.build_record(task))
            .buffered(self.max_concurrent_log_fetches)
            .try_collect()
            .await?;

        info!("失败任务报告生成完成: {} 条", records.len());
        Ok(records)
    }

    /// 每个失败任务都会请求日志令牌，日志引用为空时同样如此，由QRS决定是否可下载
    async fn build_record(&self, task: TaskRecord) -> ReporterResult<FailedTaskRecord> {
        if !task.has_log_reference() {
            warn!("失败任务没有日志引用: task_id={}", task.id);
        }

        let log = self.source.fetch_task_log(&task).await?;
        let error_message = extract_error_message(&log);

        debug!("任务 {} 错误信息: {}", task.name, error_message);
        Ok(FailedTaskRecord::from_task(&task, error_message, Local::now()))
    }
}
