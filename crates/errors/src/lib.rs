use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("证书错误: {path} - {message}")]
    Certificate { path: String, message: String },
    #[error("网络错误: {0}")]
    Network(String),
    #[error("HTTP请求失败: {url} 返回状态码 {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("响应解析失败: {endpoint} - {message}")]
    Decode { endpoint: String, message: String },
    #[error("存储错误: {0}")]
    Storage(String),
}

pub type ReporterResult<T> = Result<T, ReporterError>;

impl ReporterError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn certificate<P: Into<String>, S: Into<String>>(path: P, msg: S) -> Self {
        Self::Certificate {
            path: path.into(),
            message: msg.into(),
        }
    }
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }
    pub fn decode<E: Into<String>, S: Into<String>>(endpoint: E, msg: S) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: msg.into(),
        }
    }
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
mod tests;
