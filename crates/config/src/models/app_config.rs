use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::{
    logging::ObservabilityConfig,
    output_pipeline::{OutputConfig, PipelineConfig},
    qrs::QrsConfig,
};
use crate::validation::ConfigValidator;

/// 旧版部署使用的环境变量
pub const LEGACY_HOST_ENV: &str = "GO_QLIK_HOST";
pub const LEGACY_CERTS_PATH_ENV: &str = "GO_QLIK_CERTS_PATH";

pub const ENV_PREFIX: &str = "REPORTER";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub qrs: QrsConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
    pub observability: ObservabilityConfig,
}

/// 命令行参数覆盖项，优先级最高
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub certs_path: Option<String>,
    pub output_dir: Option<String>,
    pub max_concurrent_log_fetches: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl AppConfig {
    pub fn load(config_path: Option<&str>, overrides: &ConfigOverrides) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(config_path, overrides, env)
    }

    /// 按 默认值 < 配置文件 < REPORTER_* < GO_QLIK_* < 命令行 的顺序合并配置
    pub fn load_with_env(
        config_path: Option<&str>,
        overrides: &ConfigOverrides,
        env: HashMap<String, String>,
    ) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("qrs.host", defaults.qrs.host.clone())?
            .set_default("qrs.port", i64::from(defaults.qrs.port))?
            .set_default("qrs.certs_path", defaults.qrs.certs_path.clone())?
            .set_default("qrs.client_cert_file", defaults.qrs.client_cert_file.clone())?
            .set_default("qrs.client_key_file", defaults.qrs.client_key_file.clone())?
            .set_default("qrs.root_cert_file", defaults.qrs.root_cert_file.clone())?
            .set_default("qrs.xrf_key", defaults.qrs.xrf_key.clone())?
            .set_default("qrs.user_directory", defaults.qrs.user_directory.clone())?
            .set_default("qrs.user_id", defaults.qrs.user_id.clone())?
            .set_default(
                "qrs.request_timeout_seconds",
                defaults.qrs.request_timeout_seconds as i64,
            )?
            .set_default("output.directory", defaults.output.directory.clone())?
            .set_default(
                "pipeline.max_concurrent_log_fetches",
                defaults.pipeline.max_concurrent_log_fetches as i64,
            )?
            .set_default(
                "observability.log_level",
                defaults.observability.log_level.to_string(),
            )?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format.to_string(),
            )?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .set_override_option("qrs.host", env.get(LEGACY_HOST_ENV).cloned())?
            .set_override_option("qrs.certs_path", env.get(LEGACY_CERTS_PATH_ENV).cloned())?
            .set_override_option("qrs.host", overrides.host.clone())?
            .set_override_option("qrs.certs_path", overrides.certs_path.clone())?
            .set_override_option("output.directory", overrides.output_dir.clone())?
            .set_override_option(
                "pipeline.max_concurrent_log_fetches",
                overrides.max_concurrent_log_fetches.map(|n| n as i64),
            )?
            .set_override_option("observability.log_level", overrides.log_level.clone())?
            .set_override_option("observability.log_format", overrides.log_format.clone())?;

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.qrs.validate()?;
        self.output.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}
