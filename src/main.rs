use anyhow::{Context, Result};
use clap::Parser;
use reporter_config::{AppConfig, ConfigOverrides};

use qrs_task_reporter::app::Application;
use qrs_task_reporter::common::init_logging;

/// QRS失败任务报告工具
#[derive(Parser, Debug)]
#[command(name = "qrs-task-reporter")]
#[command(version)]
#[command(about = "QRS失败任务报告工具")]
#[command(long_about = "从QRS拉取最近一次执行失败的任务，提取日志中的错误信息并追加写入当天的CSV文件")]
struct Cli {
    /// 配置文件路径 (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// QRS主机名，覆盖 GO_QLIK_HOST
    #[arg(long)]
    host: Option<String>,

    /// 证书目录，覆盖 GO_QLIK_CERTS_PATH
    #[arg(long, value_name = "DIR")]
    certs_path: Option<String>,

    /// CSV输出目录
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// 同时拉取日志的最大任务数
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: Option<String>,

    /// 日志格式
    #[arg(long, value_parser = ["json", "pretty"])]
    log_format: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            certs_path: self.certs_path.clone(),
            output_dir: self.output_dir.clone(),
            max_concurrent_log_fetches: self.concurrency,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("加载配置失败")?;

    // 初始化日志系统
    init_logging(config.observability.log_level, config.observability.log_format)?;

    let app = Application::new(&config)?;
    app.run().await?;

    Ok(())
}
