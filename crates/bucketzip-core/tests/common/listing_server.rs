//! Minimal HTTP/1.1 server for integration tests: serves a bucket listing and ZIP bodies.
//!
//! Each route is keyed by the full request target (path plus query) and holds a
//! queue of replies; the last reply repeats once the queue is drained, so a route
//! can fail a few times and then succeed.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    /// Send the status line and a large Content-Length, then go silent.
    pub stall: bool,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, body: body.into(), stall: false }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: format!("<Error><Code>{}</Code></Error>", status).into_bytes(),
            stall: false,
        }
    }

    /// A 200 whose body never arrives.
    pub fn stall() -> Self {
        Self { status: 200, body: Vec::new(), stall: true }
    }
}

type Routes = HashMap<String, Vec<Reply>>;

pub struct ListingServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl ListingServer {
    /// Number of requests seen for `target` (path plus query).
    pub fn hits(&self, target: &str) -> usize {
        self.hits.lock().unwrap().get(target).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Vec<Reply>)>) -> ListingServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<Mutex<Routes>> = Arc::new(Mutex::new(
        routes.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    ));
    let hits = Arc::new(Mutex::new(HashMap::new()));
    {
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
    }
    ListingServer {
        base: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &Mutex<Routes>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    *hits.lock().unwrap().entry(target.clone()).or_insert(0) += 1;

    let reply = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&target) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Reply::status(404),
        }
    };
    if reply.stall {
        let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1048576\r\n\r\n");
        thread::sleep(Duration::from_secs(30));
        return;
    }
    let reason = match reply.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
}

/// S3-style `ListBucketResult` page for `keys`.
pub fn bucket_listing(keys: &[&str], truncated: bool) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>test-bucket</Name>"#,
    );
    out.push_str(&format!("<IsTruncated>{}</IsTruncated>", truncated));
    for k in keys {
        out.push_str(&format!("<Contents><Key>{}</Key><Size>1</Size></Contents>", k));
    }
    out.push_str("</ListBucketResult>");
    out
}

/// In-memory ZIP with the given entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let opts = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, opts).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
