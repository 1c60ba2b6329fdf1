//! Mock dashboard backend for testing.
//!
//! Serves a fixed script of responses, in order, to whatever requests arrive, and records
//! every request so tests can assert on what the client actually sent. Requests beyond
//! the end of the script get a `404` with a failure envelope.

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as the mock backend received it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// The JSON body, or `Null` if the request had none.
    pub body: serde_json::Value,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<(StatusCode, String)>,
    requests: Vec<RecordedRequest>,
}

pub(crate) struct MockBackend {
    addr: SocketAddr,
    script: Arc<Mutex<Script>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    /// Starts a backend that answers with the given JSON bodies.
    pub async fn start(responses: Vec<(StatusCode, serde_json::Value)>) -> Self {
        Self::start_raw(
            responses
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect(),
        )
        .await
    }

    /// Starts a backend that answers with the given raw bodies.
    pub async fn start_raw(responses: Vec<(StatusCode, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let script = Arc::new(Mutex::new(Script {
            responses: responses.into(),
            requests: Vec::new(),
        }));

        let server = tokio::spawn({
            let script = script.clone();
            async move {
                loop {
                    let Ok((conn, _)) = listener.accept().await else {
                        break;
                    };
                    let script = script.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let script = script.clone();
                            async move { Ok::<_, Infallible>(answer(&script, req).await) }
                        });
                        if let Err(e) = hyper::server::conn::http1::Builder::new()
                            .serve_connection(TokioIo::new(conn), service)
                            .await
                        {
                            tracing::debug!("mock backend connection ended: {e}");
                        }
                    });
                }
            }
        });

        Self {
            addr,
            script,
            server,
        }
    }

    /// The API root to hand to [`ApiClient::new`](crate::api::ApiClient::new).
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().await.requests.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn answer(script: &Mutex<Script>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();
    let body = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };

    let mut script = script.lock().await;
    script.requests.push(RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        content_type: parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let (status, body) = script.responses.pop_front().unwrap_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            r#"{"success":false,"error":"no scripted response left"}"#.to_string(),
        )
    });
    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts are valid")
}
