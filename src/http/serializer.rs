//! HTTP/1.x head serialization
//!
//! The header block covers everything up to (not including) cookies and the
//! `Date` line: status line, `Content-Length`, default `Connection`,
//! `Content-Type`, user headers and the server banner. It only depends on
//! response state, so it can be cached until the next mutation. Cookies and
//! the date are appended per render.

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::date::{format_http_date, HTTP_DATE_LEN};
use super::response::HttpResponse;
use crate::error::Result;
use crate::logger;

/// Serialized head and the body length it advertises
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub head: Bytes,
    pub content_length: u64,
}

/// Build the header block for a response
///
/// Transfer files are stat'ed here; if that fails nothing is written and the
/// error is returned.
pub fn build_header_block(resp: &HttpResponse, server_header: &str) -> Result<HeaderBlock> {
    let content_length = match resp.json_body() {
        Some(body) => body.len() as u64,
        None => resp.body.content_length()?,
    };

    let mut out = BytesMut::with_capacity(256);
    out.put_slice(b"HTTP/");
    out.put_slice(resp.version.as_str().as_bytes());
    out.put_u8(b' ');
    out.put_slice(resp.status.as_u16().to_string().as_bytes());
    out.put_u8(b' ');
    out.put_slice(resp.status_message.as_bytes());
    out.put_slice(b"\r\n");

    out.put_slice(b"Content-Length: ");
    out.put_slice(content_length.to_string().as_bytes());
    out.put_slice(b"\r\n");

    if resp.close_connection && !resp.headers.contains("Connection") {
        out.put_slice(b"Connection: close\r\n");
    }

    out.put_slice(resp.content_type_line.as_bytes());

    for (name, value) in resp.headers.iter() {
        out.put_slice(name.as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }

    out.put_slice(server_header.as_bytes());

    Ok(HeaderBlock {
        head: out.freeze(),
        content_length,
    })
}

/// Append one `Set-Cookie` line per cookie
pub fn write_cookies(out: &mut BytesMut, resp: &HttpResponse) {
    for cookie in resp.cookies.values() {
        out.put_slice(cookie.to_header_line().as_bytes());
    }
}

/// Terminate the head, with a `Date` line when enabled
///
/// Returns the byte offset of the date text inside `out`.
pub fn write_date(out: &mut BytesMut, now: Option<DateTime<Utc>>) -> Option<usize> {
    let Some(now) = now else {
        out.put_slice(b"\r\n");
        return None;
    };
    let date = format_http_date(now);
    out.put_slice(b"Date: ");
    let offset = out.len();
    out.put_slice(date.as_bytes());
    out.put_slice(b"\r\n\r\n");
    (date.len() == HTTP_DATE_LEN).then_some(offset)
}

/// Compact JSON writer: no comments, no indentation
pub(crate) fn serialize_json(value: &Value) -> Bytes {
    match serde_json::to_vec(value) {
        Ok(buf) => Bytes::from(buf),
        Err(e) => {
            logger::log_json_write_failed(&e);
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mime::ContentType;
    use crate::http::status::{StatusCode, Version};
    use chrono::TimeZone;

    fn head_text(resp: &HttpResponse, server: &str) -> String {
        let block = build_header_block(resp, server).unwrap();
        String::from_utf8(block.head.to_vec()).unwrap()
    }

    #[test]
    fn test_header_block_layout() {
        let mut resp = HttpResponse::new();
        resp.set_content_type(ContentType::TextPlain);
        resp.add_header("X-Request-Id", "abc");
        resp.set_body("hello");

        assert_eq!(
            head_text(&resp, "Server: unit\r\n"),
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain; charset=utf-8\r\nX-Request-Id: abc\r\nServer: unit\r\n"
        );
    }

    #[test]
    fn test_connection_close_only_without_explicit_header() {
        let mut resp = HttpResponse::new();
        resp.set_close_connection(true);
        assert!(head_text(&resp, "").contains("Connection: close\r\n"));

        resp.add_header("Connection", "upgrade");
        let text = head_text(&resp, "");
        assert!(!text.contains("Connection: close"));
        assert!(text.contains("Connection: upgrade\r\n"));
    }

    #[test]
    fn test_empty_reason_is_not_synthesized() {
        let mut resp = HttpResponse::new();
        resp.set_status_code(StatusCode::NotFound);
        resp.set_status_message("");
        resp.set_version(Version::Http10);
        assert!(head_text(&resp, "").starts_with("HTTP/1.0 404 \r\n"));
    }

    #[test]
    fn test_json_payload_becomes_body() {
        let mut resp = HttpResponse::new();
        resp.set_json_object(serde_json::json!({ "a": [1, 2] }));
        let block = build_header_block(&resp, "").unwrap();
        assert_eq!(resp.body_bytes(), Some(&b"{\"a\":[1,2]}"[..]));
        assert_eq!(block.content_length, 11);
        let text = String::from_utf8(block.head.to_vec()).unwrap();
        assert!(text.contains("Content-Length: 11\r\n"));
    }

    #[test]
    fn test_stat_failure_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut resp = HttpResponse::new();
        resp.set_sendfile(dir.path().join("missing.iso"));
        assert!(build_header_block(&resp, "").is_err());
    }

    #[test]
    fn test_write_date_offset() {
        let mut out = BytesMut::from(&b"HTTP/1.1 200 OK\r\n"[..]);
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        let offset = write_date(&mut out, Some(now)).unwrap();
        assert_eq!(
            &out[offset..offset + HTTP_DATE_LEN],
            b"Fri, 23 Aug 2019 12:58:03 GMT"
        );
        assert!(out.ends_with(b"GMT\r\n\r\n"));

        let mut bare = BytesMut::new();
        assert_eq!(write_date(&mut bare, None), None);
        assert_eq!(&bare[..], b"\r\n");
    }
}
