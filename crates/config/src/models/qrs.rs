use crate::validation::{ConfigValidator, ValidationUtils};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// QRS管理接口连接配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrsConfig {
    pub host: String,
    pub port: u16,
    /// 存放客户端证书、私钥和根证书的目录
    pub certs_path: String,
    pub client_cert_file: String,
    pub client_key_file: String,
    pub root_cert_file: String,
    pub xrf_key: String,
    pub user_directory: String,
    pub user_id: String,
    pub request_timeout_seconds: u64,
}

impl Default for QrsConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 4242,
            certs_path: String::new(),
            client_cert_file: "client.pem".to_string(),
            client_key_file: "client_key.pem".to_string(),
            root_cert_file: "root.pem".to_string(),
            xrf_key: "ABCDEFG123456789".to_string(),
            user_directory: "internal".to_string(),
            user_id: "sa_api".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl QrsConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/qrs/", self.host, self.port)
    }

    pub fn client_cert_path(&self) -> PathBuf {
        PathBuf::from(&self.certs_path).join(&self.client_cert_file)
    }

    pub fn client_key_path(&self) -> PathBuf {
        PathBuf::from(&self.certs_path).join(&self.client_key_file)
    }

    pub fn root_cert_path(&self) -> PathBuf {
        PathBuf::from(&self.certs_path).join(&self.root_cert_file)
    }

    /// X-Qlik-User请求头的值
    pub fn user_header(&self) -> String {
        format!(
            "UserDirectory={}; UserId={}",
            self.user_directory, self.user_id
        )
    }
}

impl ConfigValidator for QrsConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.host, "qrs.host")?;
        ValidationUtils::validate_port(self.port)?;
        ValidationUtils::validate_not_empty(&self.certs_path, "qrs.certs_path")?;
        ValidationUtils::validate_not_empty(&self.client_cert_file, "qrs.client_cert_file")?;
        ValidationUtils::validate_not_empty(&self.client_key_file, "qrs.client_key_file")?;
        ValidationUtils::validate_not_empty(&self.root_cert_file, "qrs.root_cert_file")?;
        ValidationUtils::validate_xrf_key(&self.xrf_key, "qrs.xrf_key")?;
        ValidationUtils::validate_not_empty(&self.user_directory, "qrs.user_directory")?;
        ValidationUtils::validate_not_empty(&self.user_id, "qrs.user_id")?;
        ValidationUtils::validate_timeout_seconds(self.request_timeout_seconds)?;

        if self.host.contains("://") || self.host.contains('/') {
            return Err(crate::ConfigError::Validation(format!(
                "qrs.host must be a bare host name, got: {}",
                self.host
            )));
        }

        Ok(())
    }
}
