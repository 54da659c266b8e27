//! 进程内的QRS替身服务，供客户端和端到端测试使用
//!
//! 只实现失败报告用到的三个接口，并校验每个请求的 xrfkey 和 X-Qlik-User。

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reporter_domain::TaskRecord;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const FAKE_XRF_KEY: &str = "ABCDEFG123456789";
pub const FAKE_USER_HEADER: &str = "UserDirectory=internal; UserId=sa_api";

/// 替身服务收到的一次请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub xrf_header: Option<String>,
    pub user_header: Option<String>,
}

#[derive(Default)]
struct FakeQrsState {
    tasks: Vec<TaskRecord>,
    task_list_body: Option<String>,
    logs: HashMap<String, String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeQrsServer {
    addr: SocketAddr,
    state: Arc<FakeQrsState>,
    handle: JoinHandle<()>,
}

impl FakeQrsServer {
    /// `logs` 以任务ID为键；没有日志的任务下载时返回404
    pub async fn start(tasks: Vec<TaskRecord>, logs: HashMap<String, String>) -> Self {
        Self::spawn(FakeQrsState {
            tasks,
            logs,
            ..FakeQrsState::default()
        })
        .await
    }

    /// 任务列表接口直接返回给定的原始内容
    pub async fn start_with_task_list_body(body: &str) -> Self {
        Self::spawn(FakeQrsState {
            task_list_body: Some(body.to_string()),
            ..FakeQrsState::default()
        })
        .await
    }

    async fn spawn(state: FakeQrsState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/qrs/task/full", get(task_full))
            .route("/qrs/ReloadTask/{task_id}/scriptlog", get(script_log_token))
            .route("/qrs/download/reloadtask/{token}/{file}", get(download_log))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake QRS listener");
        let addr = listener.local_addr().expect("fake QRS local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake QRS server");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/qrs/", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeQrsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn token_for(task_id: &str) -> String {
    format!("token-{task_id}")
}

fn authorize(
    state: &FakeQrsState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<(), StatusCode> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let request = RecordedRequest {
        path: uri.path().to_string(),
        query: query.clone(),
        xrf_header: header_value("X-Qlik-xrfkey"),
        user_header: header_value("X-Qlik-User"),
    };
    let authorized = request.xrf_header.as_deref() == Some(FAKE_XRF_KEY)
        && query.get("xrfkey").map(String::as_str) == Some(FAKE_XRF_KEY)
        && request.user_header.as_deref() == Some(FAKE_USER_HEADER);

    state.requests.lock().unwrap().push(request);

    if authorized {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

async fn task_full(
    State(state): State<Arc<FakeQrsState>>,
    uri: OriginalUri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(status) = authorize(&state, &uri, &headers, &query) {
        return status.into_response();
    }

    match &state.task_list_body {
        Some(body) => body.clone().into_response(),
        None => Json(state.tasks.clone()).into_response(),
    }
}

async fn script_log_token(
    State(state): State<Arc<FakeQrsState>>,
    uri: OriginalUri,
    headers: HeaderMap,
    Path(task_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(status) = authorize(&state, &uri, &headers, &query) {
        return status.into_response();
    }

    let reference = query.get("fileReferenceId").cloned().unwrap_or_default();
    let known = state
        .tasks
        .iter()
        .any(|t| t.id == task_id && t.log_file_reference_id == reference);
    if !known {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(serde_json::json!({ "value": token_for(&task_id) })).into_response()
}

async fn download_log(
    State(state): State<Arc<FakeQrsState>>,
    uri: OriginalUri,
    headers: HeaderMap,
    Path((token, file)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(status) = authorize(&state, &uri, &headers, &query) {
        return status.into_response();
    }

    let task = state
        .tasks
        .iter()
        .find(|t| token_for(&t.id) == token && format!("{}.log", t.name) == file);
    match task.and_then(|t| state.logs.get(&t.id)) {
        Some(log) => log.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
