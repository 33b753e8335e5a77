//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies per path with a configurable status, and records the
//! request path and User-Agent of every request it sees.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 200, body }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error page".to_vec(),
        }
    }
}

#[derive(Debug, Default)]
struct Seen {
    paths: Vec<String>,
    user_agents: Vec<Option<String>>,
}

pub struct FileServer {
    base: String,
    seen: Arc<Mutex<Seen>>,
}

impl FileServer {
    /// Starts a server in a background thread. Unknown paths get 404.
    /// The server runs until the process exits.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(p, r)| (p.to_string(), r))
                .collect(),
        );
        let seen = Arc::new(Mutex::new(Seen::default()));
        let seen_srv = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen_srv);
                thread::spawn(move || handle(stream, &routes, &seen));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            seen,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.seen.lock().unwrap().paths.clone()
    }

    pub fn user_agents(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().user_agents.clone()
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>, seen: &Mutex<Seen>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let Ok(request) = std::str::from_utf8(&request) else {
        return;
    };
    let (path, user_agent) = parse_request(request);
    {
        let mut s = seen.lock().unwrap();
        s.paths.push(path.clone());
        s.user_agents.push(user_agent);
    }

    let route_path = path.split('?').next().unwrap_or("");
    let (status, body) = match routes.get(route_path) {
        Some(r) => (r.status, r.body.as_slice()),
        None => (404, b"not found".as_slice()),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// Returns (request target, User-Agent header if any).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let mut user_agent = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim().to_string());
            }
        }
    }
    (path, user_agent)
}
