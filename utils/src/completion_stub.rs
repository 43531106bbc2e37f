//! In-process stand-in for a chat completions API, for tests.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// What the stub answers to every request.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// 200 with a single choice carrying this text.
    Text(String),
    /// 200 with an empty `choices` array.
    NoChoices,
    /// The given status code and JSON body.
    Status(u16, Value),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

struct StubState {
    reply: StubReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running stub. The server task lives until the test runtime shuts down.
pub struct CompletionStub {
    /// Value for `OPENAI_API_BASE`, e.g. `http://127.0.0.1:41234/v1`.
    pub api_base: String,
    state: Arc<StubState>,
}

impl CompletionStub {
    pub async fn start(reply: StubReply) -> Self {
        let state = Arc::new(StubState {
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind completion stub");
        let addr = listener.local_addr().expect("stub has no local address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("completion stub crashed");
        });

        Self {
            api_base: format!("http://{addr}/v1"),
            state,
        }
    }

    /// Serves one request with `status` and a body that ends before its declared
    /// `content-length`. Returns the value for `OPENAI_API_BASE`.
    pub async fn start_truncated(status: u16) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind completion stub");
        let addr = listener.local_addr().expect("stub has no local address");
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("stub accept failed");
            read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\n\
                 content-length: 1024\r\nconnection: close\r\n\r\n{{\"error\":"
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("stub write failed");
            stream.shutdown().await.expect("stub shutdown failed");
        });

        format!("http://{addr}/v1")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Reads one request head and its `content-length` body.
async fn read_request(stream: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.expect("stub read failed");
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            return;
        }
    }
}

async fn chat_completions(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            authorization,
            body,
        });

    match &state.reply {
        StubReply::Text(text) => Json(json!({
            "id": "chatcmpl-stub",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        StubReply::NoChoices => Json(json!({ "choices": [] })).into_response(),
        StubReply::Status(code, body) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body.clone())).into_response()
        }
    }
}
