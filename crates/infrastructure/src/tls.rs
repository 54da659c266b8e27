use std::error::Error as StdError;
use std::path::Path;
use std::time::Duration;

use reporter_config::QrsConfig;
use reporter_errors::{ReporterError, ReporterResult};
use reqwest::{Certificate, Identity};
use tracing::debug;

/// 双向TLS所需的客户端身份和根证书
pub struct ClientTlsMaterial {
    pub identity: Identity,
    pub root_certificates: Vec<Certificate>,
}

/// 从证书目录加载 client.pem、client_key.pem 和 root.pem
pub fn load_tls_material(config: &QrsConfig) -> ReporterResult<ClientTlsMaterial> {
    let cert_path = config.client_cert_path();
    let key_path = config.client_key_path();
    let root_path = config.root_cert_path();

    let mut identity_pem = read_pem(&cert_path)?;
    identity_pem.push(b'\n');
    identity_pem.extend_from_slice(&read_pem(&key_path)?);

    let identity = Identity::from_pem(&identity_pem).map_err(|e| {
        ReporterError::certificate(
            format!("{} + {}", cert_path.display(), key_path.display()),
            format!("客户端证书或私钥无效: {e}"),
        )
    })?;

    let root_certificates = Certificate::from_pem_bundle(&read_pem(&root_path)?)
        .map_err(|e| {
            ReporterError::certificate(
                root_path.display().to_string(),
                format!("根证书解析失败: {e}"),
            )
        })?;

    if root_certificates.is_empty() {
        return Err(ReporterError::certificate(
            root_path.display().to_string(),
            "根证书文件中没有证书",
        ));
    }

    debug!(
        "已加载TLS证书: client={}, roots={}",
        cert_path.display(),
        root_certificates.len()
    );

    Ok(ClientTlsMaterial {
        identity,
        root_certificates,
    })
}

/// 创建双向TLS客户端：携带客户端证书，不校验服务端证书，只允许HTTPS
pub fn build_mtls_client(config: &QrsConfig) -> ReporterResult<reqwest::Client> {
    let material = load_tls_material(config)?;

    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .identity(material.identity)
        .danger_accept_invalid_certs(true)
        .https_only(true)
        .no_proxy()
        .timeout(Duration::from_secs(config.request_timeout_seconds));
    for certificate in material.root_certificates {
        builder = builder.add_root_certificate(certificate);
    }

    builder.build().map_err(|e| {
        ReporterError::certificate(
            config.certs_path.clone(),
            format!("创建TLS客户端失败: {}", error_chain(&e)),
        )
    })
}

/// 拼接错误及其全部 source，reqwest 的顶层信息只有 "builder error"
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn read_pem(path: &Path) -> ReporterResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        ReporterError::certificate(path.display().to_string(), format!("读取证书文件失败: {e}"))
    })
}
