use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::State,
    http::{
        HeaderMap, Method, StatusCode, Uri,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::{IntoResponse as _, Response},
};
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use parking_lot::Mutex;
use rcgen::CertifiedKey;
use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::TcpListener,
    task::JoinHandle,
};
use tokio_rustls::{
    TlsAcceptor,
    rustls::{
        ServerConfig,
        crypto::ring,
        pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer},
    },
};

use super::Logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct TestRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
}

impl TestRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl TestResponse {
    pub fn ok<B: AsRef<[u8]>>(body: B) -> Self {
        Self::status(200, body)
    }

    pub fn status<B: AsRef<[u8]>>(status: u16, body: B) -> Self {
        Self {
            status,
            body: body.as_ref().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = dyn Fn(&TestRequest) -> TestResponse + Send + Sync;

#[derive(Default)]
struct Stats {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<TestRequest>>,
}

impl Stats {
    fn enter(&self, req: TestRequest) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(req);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
struct AppState {
    stats: Arc<Stats>,
    handler: Arc<Handler>,
}

/// Loopback HTTP server with scripted responses.
///
/// A request counts as in flight from the moment the handler is entered until
/// its response is handed back to the framework.
pub struct TestServer {
    base_url: String,
    stats: Arc<Stats>,
    join_handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start<F>(handler: F) -> std::io::Result<Self>
    where
        F: Fn(&TestRequest) -> TestResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (stats, app) = Self::app(handler);

        let join_handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            stats,
            join_handle,
        })
    }

    /// Serves over HTTPS with a freshly generated self-signed certificate for `localhost`.
    pub async fn start_tls<F>(handler: F) -> Result<Self, BoxError>
    where
        F: Fn(&TestRequest) -> TestResponse + Send + Sync + 'static,
    {
        let CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])?;
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)?;
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (stats, app) = Self::app(handler);

        let join_handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    continue;
                };
                let acceptor = acceptor.clone();
                let app = app.clone();
                tokio::spawn(async move {
                    // Clients that reject the certificate end here.
                    let Ok(stream) = acceptor.accept(stream).await else {
                        return;
                    };
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), TowerToHyperService::new(app))
                        .await;
                });
            }
        });

        Ok(Self {
            base_url: format!("https://localhost:{}", addr.port()),
            stats,
            join_handle,
        })
    }

    /// Answers every request with `200 OK` and a `Content-Length` larger than
    /// `body`, then closes the connection.
    pub async fn start_truncated(body: &'static str, declared_length: usize) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let stats = Arc::new(Stats::default());

        let stats_clone = stats.clone();
        let join_handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    continue;
                };
                stats_clone.hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    if stream.read(&mut buf).await.is_err() {
                        return;
                    }
                    let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {declared_length}\r\nConnection: close\r\n\r\n");
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(body.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            stats,
            join_handle,
        })
    }

    /// Returns a loopback address nothing is listening on.
    pub async fn unused_addr() -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.stats.hits.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TestRequest> {
        self.stats.requests.lock().clone()
    }

    fn app<F>(handler: F) -> (Arc<Stats>, Router)
    where
        F: Fn(&TestRequest) -> TestResponse + Send + Sync + 'static,
    {
        let stats = Arc::new(Stats::default());
        let state = AppState {
            stats: stats.clone(),
            handler: Arc::new(handler),
        };
        let app = Router::new().fallback(scripted).with_state(state);
        (stats, app)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}

async fn scripted(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let req = TestRequest {
        method: method.to_string(),
        path: uri.path_and_query().map(|v| v.as_str().to_string()).unwrap_or_default(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
    };

    let res = (state.handler)(&req);
    state.stats.enter(req);
    if !res.delay.is_zero() {
        tokio::time::sleep(res.delay).await;
    }
    state.stats.leave();

    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let len = res.body.len().to_string();
    let body = if method == Method::HEAD { Vec::new() } else { res.body };

    (status, [(CONTENT_TYPE, "text/plain".to_string()), (CONTENT_LENGTH, len)], body).into_response()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Debug,
}

/// Logger that keeps every line for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn count(&self, level: LogLevel) -> usize {
        self.lines.lock().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn lines(&self, level: LogLevel) -> Vec<String> {
        self.lines.lock().iter().filter(|(l, _)| *l == level).map(|(_, m)| m.clone()).collect()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, message: &str) {
        self.lines.lock().push((LogLevel::Error, message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.lines.lock().push((LogLevel::Warning, message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.lines.lock().push((LogLevel::Debug, message.to_string()));
    }
}
