use async_trait::async_trait;
use reporter_config::QrsConfig;
use reporter_domain::{LogAccessToken, TaskRecord, TaskSource};
use reporter_errors::{ReporterError, ReporterResult};
use reqwest::Url;
use tracing::{debug, info};

use crate::tls::build_mtls_client;

pub const XRF_KEY_HEADER: &str = "X-Qlik-xrfkey";
pub const XRF_KEY_QUERY: &str = "xrfkey";
pub const USER_HEADER: &str = "X-Qlik-User";

/// QRS管理接口客户端
///
/// 每个请求都携带 xrfkey（请求头和查询参数各一份）以及 X-Qlik-User 身份头。
/// 日志下载令牌只在 [`TaskSource::fetch_task_log`] 内部使用，不对外暴露。
#[derive(Debug, Clone)]
pub struct QrsClient {
    http: reqwest::Client,
    base_url: Url,
    xrf_key: String,
    user_header: String,
}

impl QrsClient {
    /// 加载证书并创建双向TLS客户端。服务端证书不做校验，但只允许HTTPS
    pub fn new(config: &QrsConfig) -> ReporterResult<Self> {
        let http = build_mtls_client(config)?;

        info!("QRS客户端已创建: {}", config.base_url());

        Self::with_http_client(
            http,
            &config.base_url(),
            config.xrf_key.clone(),
            config.user_header(),
        )
    }

    /// 使用现成的HTTP客户端，证书由调用方负责
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        xrf_key: impl Into<String>,
        user_header: impl Into<String>,
    ) -> ReporterResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ReporterError::config_error(format!("无效的QRS地址 {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ReporterError::config_error(format!(
                "无效的QRS地址: {base_url}"
            )));
        }

        Ok(Self {
            http,
            base_url,
            xrf_key: xrf_key.into(),
            user_header: user_header.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 获取全部任务 `GET task/full`
    pub async fn fetch_tasks(&self) -> ReporterResult<Vec<TaskRecord>> {
        let url = self.endpoint_url(&["task", "full"])?;
        let body = self.get_bytes(url, &[]).await?;

        let tasks: Vec<TaskRecord> = serde_json::from_slice(&body)
            .map_err(|e| ReporterError::decode("task/full", e.to_string()))?;

        info!("获取任务列表完成: total={}", tasks.len());
        Ok(tasks)
    }

    /// 获取任务最近一次执行的日志正文
    pub async fn fetch_task_log(&self, task: &TaskRecord) -> ReporterResult<String> {
        let token = self
            .fetch_log_token(&task.id, &task.log_file_reference_id)
            .await?;
        self.download_log(&token, &task.name).await
    }

    async fn fetch_log_token(
        &self,
        task_id: &str,
        file_reference_id: &str,
    ) -> ReporterResult<LogAccessToken> {
        let url = self.endpoint_url(&["ReloadTask", task_id, "scriptlog"])?;
        let body = self
            .get_bytes(url, &[("fileReferenceId", file_reference_id)])
            .await?;

        serde_json::from_slice(&body).map_err(|e| {
            ReporterError::decode(format!("ReloadTask/{task_id}/scriptlog"), e.to_string())
        })
    }

    async fn download_log(&self, token: &LogAccessToken, task_name: &str) -> ReporterResult<String> {
        let file_name = format!("{task_name}.log");
        let url = self.endpoint_url(&["download", "reloadtask", &token.value, &file_name])?;
        let body = self.get_bytes(url, &[]).await?;

        debug!("日志下载完成: task={}, bytes={}", task_name, body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn endpoint_url(&self, segments: &[&str]) -> ReporterResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReporterError::config_error(format!("无效的QRS地址: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url, query: &[(&str, &str)]) -> ReporterResult<Vec<u8>> {
        let endpoint = url.path().to_string();
        debug!("QRS请求: GET {}", endpoint);

        let response = self
            .http
            .get(url)
            .header(XRF_KEY_HEADER, &self.xrf_key)
            .header(USER_HEADER, &self.user_header)
            .query(query)
            .query(&[(XRF_KEY_QUERY, self.xrf_key.as_str())])
            .send()
            .await
            .map_err(|e| ReporterError::network(format!("请求 {endpoint} 失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReporterError::HttpStatus {
                url: endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ReporterError::network(format!("读取 {endpoint} 响应失败: {e}")))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl TaskSource for QrsClient {
    async fn fetch_tasks(&self) -> ReporterResult<Vec<TaskRecord>> {
        QrsClient::fetch_tasks(self).await
    }

    async fn fetch_task_log(&self, task: &TaskRecord) -> ReporterResult<String> {
        QrsClient::fetch_task_log(self, task).await
    }
}
