// vyasa-client/tests/common/mod.rs
// Shared test helpers: recording transport, tokens, log capture

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use reqwest::Url;
use serde_json::{Value, json};
use vyasa_client::{
    Anonymous, Authenticated, ClientConfig, HttpRequest, HttpResponse, RequestBody, Transport,
    TransportError, VyasaClient,
};

pub const BASE_URL: &str = "http://mock.vyasa.local";

#[derive(Debug, Clone)]
pub enum Reply {
    Response(HttpResponse),
    Timeout,
    Refused,
}

struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

/// Transport that records every request and answers from scripted routes
///
/// Each route replays its replies in order and repeats the last one.
/// Unscripted requests get a 404.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    routes: Mutex<Vec<Route>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        let body = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };
        let response = HttpResponse::new(StatusCode::from_u16(status).unwrap(), body);
        self.push(method, path, Reply::Response(response))
    }

    pub fn on_raw(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        let response = HttpResponse::new(StatusCode::from_u16(status).unwrap(), body.as_bytes());
        self.push(method, path, Reply::Response(response))
    }

    pub fn on_reply(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.push(method, path, reply)
    }

    /// Delay every reply (use with paused time)
    pub fn with_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let mut routes = self.routes.lock();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn count_path(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request recorded")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = path_of(&request.url);
        let method = request.method.clone();
        self.requests.lock().push(request);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut routes = self.routes.lock();
            routes
                .iter_mut()
                .find(|r| r.method == method && r.path == path)
                .map(|route| {
                    if route.replies.len() > 1 {
                        route.replies.pop_front().unwrap()
                    } else {
                        route.replies[0].clone()
                    }
                })
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            Some(Reply::Refused) => Err(TransportError::Connect("connection refused".into())),
            None => Ok(HttpResponse::new(
                StatusCode::NOT_FOUND,
                json!({"message": format!("Cannot {method} {path}"), "statusCode": 404})
                    .to_string(),
            )),
        }
    }
}

pub fn path_of(url: &str) -> String {
    Url::parse(url).unwrap().path().to_string()
}

pub fn query_of(url: &str) -> Vec<(String, String)> {
    Url::parse(url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn header(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
}

pub fn json_body(request: &HttpRequest) -> Value {
    match &request.body {
        RequestBody::Json(value) => value.clone(),
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

/// Unsigned token with the given role and school
pub fn token_for(role: &str, school_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "sub": "user-1",
            "phone": "+919876543210",
            "role": role,
            "schoolId": school_id,
            "iat": 1735689600,
            "exp": 1735776000
        })
        .to_string(),
    );
    format!("{header}.{payload}.sig")
}

pub fn config() -> ClientConfig {
    ClientConfig::new(BASE_URL).with_retry_base_delay(Duration::from_millis(10))
}

pub fn client(transport: Arc<MockTransport>) -> VyasaClient<Anonymous> {
    VyasaClient::builder()
        .config(config())
        .transport(transport)
        .build()
        .unwrap()
}

pub fn logged_in(transport: Arc<MockTransport>, role: &str, school_id: &str) -> VyasaClient<Authenticated> {
    client(transport)
        .login_with_token(&token_for(role, school_id))
        .unwrap()
}

/// Tenant-owned record stub
pub fn record(id: &str, school_id: &str, extra: Value) -> Value {
    let mut value = json!({
        "id": id,
        "schoolId": school_id,
        "createdAt": "2025-01-01T00:00:00.000Z",
        "updatedAt": "2025-01-01T00:00:00.000Z"
    });
    if let (Some(target), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    value
}

// ========== Log capture ==========

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture `warn` and above for the current thread until the guard drops
pub fn capture_warnings() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
