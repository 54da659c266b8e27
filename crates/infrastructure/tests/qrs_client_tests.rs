use std::collections::HashMap;

use reporter_domain::{ExecutionStatus, TaskSource};
use reporter_errors::ReporterError;
use reporter_infrastructure::QrsClient;
use reporter_testing_utils::{
    reload_log, FakeQrsServer, TaskRecordBuilder, FAKE_USER_HEADER, FAKE_XRF_KEY,
};

fn plain_http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn client_for(server: &FakeQrsServer) -> QrsClient {
    QrsClient::with_http_client(
        plain_http(),
        &server.base_url(),
        FAKE_XRF_KEY,
        FAKE_USER_HEADER,
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_tasks_decodes_listing() {
    let tasks = vec![
        TaskRecordBuilder::new().with_id("t1").with_name("Load A").failed().build(),
        TaskRecordBuilder::new()
            .with_id("t2")
            .with_status(ExecutionStatus::AbortInitiated)
            .build(),
    ];
    let server = FakeQrsServer::start(tasks.clone(), HashMap::new()).await;

    let fetched = client_for(&server).fetch_tasks().await.unwrap();
    assert_eq!(fetched, tasks);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/qrs/task/full");
    assert_eq!(requests[0].xrf_header.as_deref(), Some(FAKE_XRF_KEY));
    assert_eq!(
        requests[0].query.get("xrfkey").map(String::as_str),
        Some(FAKE_XRF_KEY)
    );
    assert_eq!(requests[0].user_header.as_deref(), Some(FAKE_USER_HEADER));
}

#[tokio::test]
async fn test_fetch_task_log_exchanges_token_then_downloads() {
    let task = TaskRecordBuilder::new()
        .with_id("t1")
        .with_name("Load A")
        .failed()
        .build();
    let log = reload_log(&["disk full"]);
    let server = FakeQrsServer::start(
        vec![task.clone()],
        HashMap::from([("t1".to_string(), log.clone())]),
    )
    .await;

    let client = client_for(&server);
    let body = TaskSource::fetch_task_log(&client, &task).await.unwrap();
    assert_eq!(body, log);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/qrs/ReloadTask/t1/scriptlog");
    assert_eq!(
        requests[0].query.get("fileReferenceId").map(String::as_str),
        Some("file-t1")
    );
    assert_eq!(requests[1].path, "/qrs/download/reloadtask/token-t1/Load%20A.log");
    assert!(requests
        .iter()
        .all(|r| r.xrf_header.as_deref() == Some(FAKE_XRF_KEY)));
}

#[tokio::test]
async fn test_malformed_listing_is_decode_error() {
    let server = FakeQrsServer::start_with_task_list_body("<html>maintenance</html>").await;

    let err = client_for(&server).fetch_tasks().await.err().unwrap();
    match err {
        ReporterError::Decode { endpoint, .. } => assert_eq!(endpoint, "task/full"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_log_reference_is_http_status_error() {
    let task = TaskRecordBuilder::new().with_id("t1").failed().build();
    let server = FakeQrsServer::start(vec![task.clone()], HashMap::new()).await;

    let stale = TaskRecordBuilder::new()
        .with_id("t1")
        .with_log_reference("stale-reference")
        .failed()
        .build();
    let err = client_for(&server).fetch_task_log(&stale).await.err().unwrap();
    assert!(matches!(err, ReporterError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_wrong_xrf_key_is_rejected() {
    let server = FakeQrsServer::start(vec![], HashMap::new()).await;
    let client = QrsClient::with_http_client(
        plain_http(),
        &server.base_url(),
        "ZZZZZZZZZZZZZZZZ",
        FAKE_USER_HEADER,
    )
    .unwrap();

    let err = client.fetch_tasks().await.err().unwrap();
    assert!(matches!(err, ReporterError::HttpStatus { status: 403, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = QrsClient::with_http_client(
        plain_http(),
        &format!("http://{addr}/qrs/"),
        FAKE_XRF_KEY,
        FAKE_USER_HEADER,
    )
    .unwrap();

    let err = client.fetch_tasks().await.err().unwrap();
    assert!(matches!(err, ReporterError::Network(_)));
}
