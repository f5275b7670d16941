//! In-process HTTP stub for adapter tests.
//!
//! A catch-all `axum` router answers every request with one canned reply and
//! records what it received so tests can inspect the method, target and body.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::Extension;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

/// Canned behaviour for every request.
#[derive(Debug, Clone)]
enum Reply {
    Respond { status: StatusCode, body: String },
    Hang,
}

#[derive(Debug)]
struct Stub {
    reply: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// HTTP server bound to an ephemeral loopback port.
pub struct StubServer {
    url: String,
    stub: Arc<Stub>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Answer every request with `status` and a JSON `body`.
    pub async fn respond(status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        Self::start(Reply::Respond {
            status,
            body: body.into(),
        })
        .await
    }

    /// Accept requests but never answer.
    pub async fn hang() -> Self {
        Self::start(Reply::Hang).await
    }

    async fn start(reply: Reply) -> Self {
        let stub = Arc::new(Stub {
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(record)
            .layer(Extension(Arc::clone(&stub)));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("local address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            url: format!("http://{addr}"),
            stub,
            task,
        }
    }

    /// Base URL of the server, without a trailing slash.
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.stub.requests.lock().expect("requests lock").clone()
    }

    /// The only request received.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().expect("one request")
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(
    Extension(stub): Extension<Arc<Stub>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    stub.requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.to_string(),
            target,
            body,
        });

    match &stub.reply {
        Reply::Respond { status, body } => (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        Reply::Hang => std::future::pending().await,
    }
}
