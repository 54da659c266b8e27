use async_trait::async_trait;
use reporter_errors::ReporterResult;

use crate::entities::TaskRecord;

/// 任务数据来源接口，QRS客户端和测试替身都实现它
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// 获取全部任务及其最近一次执行结果
    async fn fetch_tasks(&self) -> ReporterResult<Vec<TaskRecord>>;

    /// 获取任务最近一次执行的日志正文，令牌交换由实现方负责
    async fn fetch_task_log(&self, task: &TaskRecord) -> ReporterResult<String>;
}
