use crate::*;

#[test]
fn test_reporter_error_display() {
    let config_error = ReporterError::Configuration("qrs.host cannot be empty".to_string());
    assert_eq!(config_error.to_string(), "配置错误: qrs.host cannot be empty");

    let cert_error = ReporterError::certificate("/certs/client.pem", "文件不存在");
    assert_eq!(
        cert_error.to_string(),
        "证书错误: /certs/client.pem - 文件不存在"
    );

    let status_error = ReporterError::HttpStatus {
        url: "https://qlik:4242/qrs/task/full".to_string(),
        status: 403,
    };
    assert_eq!(
        status_error.to_string(),
        "HTTP请求失败: https://qlik:4242/qrs/task/full 返回状态码 403"
    );

    let decode_error = ReporterError::decode("task/full", "expected value at line 1");
    assert_eq!(
        decode_error.to_string(),
        "响应解析失败: task/full - expected value at line 1"
    );

    let storage_error = ReporterError::storage("permission denied");
    assert_eq!(storage_error.to_string(), "存储错误: permission denied");
}
