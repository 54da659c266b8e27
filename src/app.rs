use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reporter_application::FailedTaskPipeline;
use reporter_config::AppConfig;
use reporter_domain::{FailedTaskRecord, TaskSource};
use reporter_infrastructure::{CsvSink, QrsClient};
use tracing::info;

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub csv_path: PathBuf,
    pub records: Vec<FailedTaskRecord>,
}

/// 主应用程序：拉取失败任务并写入当天的CSV文件
pub struct Application {
    pipeline: FailedTaskPipeline,
    sink: CsvSink,
}

impl Application {
    /// 使用配置中的证书创建QRS客户端
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = QrsClient::new(&config.qrs)
            .with_context(|| format!("初始化QRS客户端失败: {}", config.qrs.base_url()))?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    pub fn with_source(config: &AppConfig, source: Arc<dyn TaskSource>) -> Self {
        Self {
            pipeline: FailedTaskPipeline::new(
                source,
                config.pipeline.max_concurrent_log_fetches,
            ),
            sink: CsvSink::new(&config.output.directory),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let records = self.pipeline.run().await.context("获取失败任务数据失败")?;
        let csv_path = self
            .sink
            .write_batch(&records)
            .context("写入CSV文件失败")?;

        info!(
            "运行完成: 失败任务 {} 个，输出文件 {}",
            records.len(),
            csv_path.display()
        );
        Ok(RunReport { csv_path, records })
    }
}
