//! Shared E2E test helpers for `arena` binary tests.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use parking_lot::Mutex;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Settings the host may carry that would change what the binary does.
const ARENA_ENV_VARS: &[&str] = &[
    "ARENA_DEBUG",
    "ARENA_VERBOSE",
    "ARENA_COLOR",
    "ARENA_API_BASE",
    "ARENA_HISTORY_LIMIT",
    "ARENA_LOG_FILE",
    "ARENA_LOG_LEVEL",
    "RUST_LOG",
];

/// Builds a Command for the `arena` binary isolated from the host.
///
/// `HOME` and the working directory point at a fresh temp dir, so no
/// global or project config is read and history lands there too.
/// Returns (command, _guard); keep the guard alive for the test's duration.
pub fn arena_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let home = tempfile::tempdir().expect("create temp home");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("arena");
    cmd.timeout(TIMEOUT_BASIC);
    for var in ARENA_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path()).current_dir(home.path());
    (cmd, home)
}

/// A canned reply for requests whose request line starts with `prefix`.
pub struct Route {
    pub prefix: &'static str,
    pub status: u16,
    pub body: String,
}

pub fn route(prefix: &'static str, status: u16, body: impl Into<String>) -> Route {
    Route {
        prefix,
        status,
        body: body.into(),
    }
}

/// Mock arena service on a background thread.
///
/// Unmatched requests get a 404 with a `detail` body. The thread lives
/// until the test process exits.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock HTTP server");
        let port = listener.local_addr().expect("get mock port").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &routes, &seen);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    /// Request lines received so far, e.g. `GET /arena/scoreboard HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn saw(&self, prefix: &str) -> bool {
        self.requests().iter().any(|r| r.starts_with(prefix))
    }
}

fn handle(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(n) => n,
            Err(_) => break,
        };
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        let req_str = String::from_utf8_lossy(&request);
        if let Some(header_end) = req_str.find("\r\n\r\n") {
            let headers = &req_str[..header_end];
            let content_length: usize = headers
                .lines()
                .find(|l| l.to_lowercase().starts_with("content-length:"))
                .and_then(|l| l.split(':').nth(1))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            if request.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    let req_str = String::from_utf8_lossy(&request);
    let request_line = req_str.lines().next().unwrap_or_default().to_string();
    seen.lock().push(request_line.clone());

    let (status, body) = routes
        .iter()
        .find(|r| request_line.starts_with(r.prefix))
        .map_or((404, r#"{"detail":"Not Found"}"#.to_string()), |r| {
            (r.status, r.body.clone())
        });

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Error",
    }
}

/// A finished three-round battle in the service's wire format.
pub fn battle_json(id: &str, topic: &str) -> String {
    let round = |phase: &str| {
        format!(
            r#"{{"phase":"{phase}","claude":"claude {phase}","gpt":"gpt {phase}","gemini":"gemini {phase}"}}"#
        )
    };
    format!(
        r#"{{"id":"{id}","topic":"{topic}","matchup":"ffa","rounds":[{},{},{}],"winner":null,"created_at":"2024-05-01T12:00:00"}}"#,
        round("opening"),
        round("rebuttal"),
        round("closer")
    )
}

pub const SCOREBOARD_JSON: &str = r#"{"champion":"claude","records":{"claude":{"wins":3,"losses":1},"gpt":{"wins":1,"losses":2},"gemini":{"wins":0,"losses":1}},"streak":2}"#;

pub const HISTORY_JSON: &str = r#"[{"id":"h-2","topic":"pineapple pizza","matchup":"ffa","winner":"claude","created_at":"2024-05-02T09:00:00"},{"id":"h-1","topic":"tabs vs spaces","matchup":"1v1","winner":null,"created_at":"2024-05-01T09:00:00"}]"#;
