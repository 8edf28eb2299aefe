// Connection handling module
// Reads one request head, answers it and closes the connection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_http_response::http::{
    build_file_response, build_not_found_response, ContentType, HttpResponse, HttpResponsePtr,
    StatusCode,
};
use rust_http_response::{logger, Result, WorkerContext};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const MAX_HEAD_SIZE: usize = 8 * 1024;

/// Serve a single request on `stream`
pub async fn serve(mut stream: TcpStream, worker: &WorkerContext) -> Result<()> {
    let Some(head) = read_request_head(&mut stream).await? else {
        return Ok(());
    };
    let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or("/");

    let is_head = method == "HEAD";
    let resp = match method {
        "GET" | "HEAD" => resolve(worker, target),
        _ => method_not_allowed(),
    };

    let server = worker.server();

    // Opened before anything is written so a vanished file still gets a
    // complete error response instead of a head without a body
    let file = match resp.sendfile_path().filter(|_| !is_head) {
        Some(path) => match tokio::fs::File::open(path).await {
            Ok(file) => Some(file),
            Err(e) => {
                logger::log_connection_error(&e);
                return send_internal_error(stream, worker).await;
            }
        },
        None => None,
    };

    let rendered = if is_head {
        resp.render_head(server).map(|head| (head, 0))
    } else {
        resp.render_with_length(server)
    };

    let (bytes, content_length) = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            logger::log_connection_error(&e);
            return send_internal_error(stream, worker).await;
        }
    };

    stream.write_all(&bytes).await?;
    if let Some(file) = file {
        send_file_body(&mut stream, file, content_length).await?;
    }
    stream.shutdown().await?;
    Ok(())
}

/// Stream exactly the advertised number of bytes from `file`
async fn send_file_body(
    stream: &mut TcpStream,
    file: tokio::fs::File,
    content_length: u64,
) -> std::io::Result<u64> {
    let sent = tokio::io::copy(&mut file.take(content_length), stream).await?;
    if sent < content_length {
        logger::log_warning(&format!(
            "transfer file shrank: sent {sent} of {content_length} bytes"
        ));
    }
    Ok(sent)
}

async fn send_internal_error(mut stream: TcpStream, worker: &WorkerContext) -> Result<()> {
    let mut fallback =
        HttpResponse::with_status(StatusCode::InternalServerError, ContentType::TextPlain);
    fallback.set_close_connection(true);
    fallback.set_body("500 Internal Server Error");
    stream.write_all(&fallback.render(worker.server())?).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Map a request target onto a file under the static directory
fn resolve(worker: &WorkerContext, target: &str) -> HttpResponsePtr {
    let static_dir = &worker.server().config().server.static_dir;
    let path = target.split(['?', '#']).next().unwrap_or_default();

    let Some(file_path) = locate(Path::new(static_dir), path) else {
        return build_not_found_response(worker);
    };

    let mut resp = build_file_response(worker, &file_path, None, None);
    // Shared pages (the worker's not-found) stay untouched
    if let Some(owned) = Arc::get_mut(&mut resp) {
        owned.set_close_connection(true);
    }
    resp
}

/// Resolve `path` inside `root`, refusing anything that escapes it
fn locate(root: &Path, path: &str) -> Option<PathBuf> {
    let root = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let mut candidate = root.join(path.trim_start_matches('/'));
    if candidate.is_dir() {
        candidate = candidate.join("index.html");
    }

    let candidate = candidate.canonicalize().ok()?;
    if !candidate.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            candidate.display()
        ));
        return None;
    }
    Some(candidate)
}

fn method_not_allowed() -> HttpResponsePtr {
    let mut resp = HttpResponse::with_status(StatusCode::MethodNotAllowed, ContentType::TextPlain);
    resp.add_header("Allow", "GET, HEAD");
    resp.set_close_connection(true);
    resp.set_body("405 Method Not Allowed");
    Arc::new(resp)
}

/// Read until the blank line ending the request head
async fn read_request_head(stream: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            buf.truncate(end);
            return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
        }
        if buf.len() > MAX_HEAD_SIZE {
            return Ok(None);
        }
    }
}
