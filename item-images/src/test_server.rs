//! A local image server for tests.
//!
//! `/missing.png` answers 404, `/slow.png` answers after two seconds, and
//! every other path answers 200 with `body of <path>`.
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;

type Hits = Arc<Mutex<Vec<String>>>;

pub struct TestServer {
    addr: SocketAddr,
    hits: Hits,
}

async fn handler(State(hits): State<Hits>, uri: Uri) -> Response {
    hits.lock().unwrap().push(uri.path().to_string());

    match uri.path() {
        "/missing.png" => StatusCode::NOT_FOUND.into_response(),
        "/slow.png" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "too late".into_response()
        }
        path => format!("body of {path}").into_response(),
    }
}

impl TestServer {
    pub async fn start() -> Self {
        let hits = Hits::default();
        let app = Router::new().fallback(handler).with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request paths received so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `future` on the current thread with a subscriber that records every
/// log line, and returns its output along with the recorded text.
pub async fn capture_logs<F: Future>(future: F) -> (F::Output, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let output = {
        let _guard = tracing::subscriber::set_default(subscriber);
        future.await
    };

    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (output, logs)
}
