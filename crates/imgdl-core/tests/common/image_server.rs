//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of paths. Each route can answer with any status,
//! wait before responding, redirect, use raw reason-phrase bytes, or announce
//! a longer body than it sends (the connection is then closed mid-stream, or
//! held open for a while first). Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Sleep this long before sending the response.
    pub delay: Duration,
    /// Content-Length to announce; when larger than `body`, the server closes early.
    pub declared_len: Option<usize>,
    pub location: Option<String>,
    /// Raw reason phrase; defaults to the standard one for `status`.
    pub reason: Option<Vec<u8>>,
    /// Keep the connection open this long after sending the body.
    pub hold: Duration,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            delay: Duration::ZERO,
            declared_len: None,
            location: None,
            reason: None,
            hold: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: format!("status {status}").into_bytes(),
            ..Self::ok(Vec::new())
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            location: Some(to.to_string()),
            ..Self::status(302)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn truncated(mut self, declared_len: usize) -> Self {
        self.declared_len = Some(declared_len);
        self
    }

    pub fn with_reason(mut self, reason: &[u8]) -> Self {
        self.reason = Some(reason.to_vec());
        self
    }

    pub fn held(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }
}

/// Running test server. The server thread lives until the process exits.
pub struct ImageServer {
    base: String,
    requests: Arc<AtomicUsize>,
}

impl ImageServer {
    /// Absolute URL for `path` (which must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `routes`.
pub fn start(routes: Vec<(&str, Route)>) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                handle(stream, &routes)
            });
        }
    });
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let route = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Route::status(404));

    if !route.delay.is_zero() {
        thread::sleep(route.delay);
    }

    let declared = route.declared_len.unwrap_or(route.body.len());
    let location = route
        .location
        .as_ref()
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let mut head = format!("HTTP/1.1 {} ", route.status).into_bytes();
    match &route.reason {
        Some(raw) => head.extend_from_slice(raw),
        None => head.extend_from_slice(reason(route.status).as_bytes()),
    }
    head.extend_from_slice(
        format!(
            "\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
            declared, location
        )
        .as_bytes(),
    );
    let _ = stream.write_all(&head);
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
    if !route.hold.is_zero() {
        thread::sleep(route.hold);
    }
}
