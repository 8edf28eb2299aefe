//! HTTP response object
//!
//! Holds everything that ends up on the wire: status line, headers, cookies,
//! content type and body. Rendering produces the complete HTTP/1.x message.
//! Every mutator drops the cached header block and render snapshot, so a
//! render always reflects the latest state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::body::Body;
use super::cookie::Cookie;
use super::headers::HeaderMap;
use super::mime::ContentType;
use super::render_cache::{CacheState, RenderCache, Snapshot};
use super::serializer::{self, HeaderBlock};
use super::status::{StatusCode, Version};
use crate::context::ServerContext;
use crate::error::Result;
use crate::logger;

/// Shared handle to a response; shared instances are only ever rendered
pub type HttpResponsePtr = Arc<HttpResponse>;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub(crate) status: StatusCode,
    pub(crate) status_message: String,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
    pub(crate) cookies: BTreeMap<String, Cookie>,
    pub(crate) content_type: ContentType,
    pub(crate) content_type_line: String,
    pub(crate) body: Body,
    pub(crate) json: Option<Value>,
    pub(crate) close_connection: bool,
    cacheable: bool,
    parsed_json: OnceLock<Option<Value>>,
    json_body: OnceLock<Bytes>,
    /// Keyed by the server banner it was built with
    header_block: OnceLock<(String, HeaderBlock)>,
    render_cache: RenderCache,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    /// `200 OK`, `text/html`, empty body
    pub fn new() -> Self {
        Self::with_status(StatusCode::Ok, ContentType::TextHtml)
    }

    pub fn with_status(status: StatusCode, content_type: ContentType) -> Self {
        let content_type_line = content_type.header_line();
        Self {
            status,
            status_message: status.reason().to_string(),
            version: Version::Http11,
            headers: HeaderMap::new(),
            cookies: BTreeMap::new(),
            content_type,
            content_type_line,
            body: Body::default(),
            json: None,
            close_connection: false,
            cacheable: false,
            parsed_json: OnceLock::new(),
            json_body: OnceLock::new(),
            header_block: OnceLock::new(),
            render_cache: RenderCache::default(),
        }
    }

    /// `200 OK` JSON response; the payload is serialized at render time
    pub fn json(value: Value) -> Self {
        let mut resp = Self::with_status(StatusCode::Ok, ContentType::ApplicationJson);
        resp.json = Some(value);
        resp
    }

    /// Redirect to `location` with the given status (usually 301, 302, 303 or 307)
    pub fn redirect(location: impl Into<String>, status: StatusCode) -> Self {
        let mut resp = Self::new();
        resp.set_status_code(status);
        resp.headers.insert("Location", location.into());
        resp
    }

    // -------------------------------------------------------------------------
    // Status line
    // -------------------------------------------------------------------------

    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Set the status and its default reason phrase
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.invalidate();
        self.status = status;
        self.status_message = status.reason().to_string();
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Override the reason phrase; an empty phrase is sent empty
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.invalidate();
        self.status_message = message.into();
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.invalidate();
        self.version = version;
    }

    pub const fn close_connection(&self) -> bool {
        self.close_connection
    }

    pub fn set_close_connection(&mut self, close: bool) {
        self.invalidate();
        self.close_connection = close;
    }

    // -------------------------------------------------------------------------
    // Headers and cookies
    // -------------------------------------------------------------------------

    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.invalidate();
        self.content_type_line = content_type.header_line();
        self.content_type = content_type;
    }

    /// Set a header, replacing any value under the same name
    ///
    /// `Set-Cookie` is parsed into the cookie table instead.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.invalidate();
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("set-cookie") {
            self.store_cookie_text(&value);
        } else {
            self.headers.insert(name, value);
        }
    }

    /// Add a raw `Name: value` line as received from upstream
    ///
    /// The name is lower-cased and the value trimmed. Lines without a colon
    /// are ignored.
    pub fn add_header_line(&mut self, line: &str) {
        let Some(colon) = line.find(':') else {
            return;
        };
        self.invalidate();
        let field = line[..colon].trim().to_ascii_lowercase();
        let value = line[colon + 1..].trim();
        if field == "set-cookie" {
            self.store_cookie_text(value);
        } else {
            self.headers.insert(field, value);
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.invalidate();
        self.headers.remove(name)
    }

    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.invalidate();
        self.cookies.insert(cookie.key.clone(), cookie);
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn cookies(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }

    pub fn remove_cookie(&mut self, name: &str) -> Option<Cookie> {
        self.invalidate();
        self.cookies.remove(name)
    }

    fn store_cookie_text(&mut self, value: &str) {
        if let Some(cookie) = Cookie::parse(value) {
            self.cookies.insert(cookie.key.clone(), cookie);
        }
    }

    // -------------------------------------------------------------------------
    // Body
    // -------------------------------------------------------------------------

    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Bytes sent as the body; `None` for direct-transfer files
    ///
    /// A JSON payload is serialized (compact) on first use and reported here.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match self.json_body() {
            Some(body) => Some(&body[..]),
            None => self.body.as_bytes(),
        }
    }

    /// Compact serialization of the JSON payload, if one is set
    pub(crate) fn json_body(&self) -> Option<&Bytes> {
        let value = self.json.as_ref()?;
        Some(self.json_body.get_or_init(|| serializer::serialize_json(value)))
    }

    /// File the transport has to send after the rendered head
    pub fn sendfile_path(&self) -> Option<&Path> {
        self.body.file_path()
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.set_body_source(Body::Buffer(body.into()));
    }

    pub fn set_body_view(&mut self, body: &'static [u8]) {
        self.set_body_source(Body::View(body));
    }

    pub fn set_sendfile(&mut self, path: impl Into<PathBuf>) {
        self.set_body_source(Body::File { path: path.into() });
    }

    /// Replace the body; also drops any JSON payload
    pub fn set_body_source(&mut self, body: Body) {
        self.invalidate();
        self.parsed_json.take();
        self.json = None;
        self.body = body;
    }

    /// Replace the body with a JSON payload
    pub fn set_json_object(&mut self, value: Value) {
        self.invalidate();
        self.parsed_json.take();
        self.body = Body::default();
        self.json = Some(value);
    }

    /// JSON payload, parsing the body on first use
    ///
    /// A body that is not valid JSON is logged and yields `None`.
    pub fn json_object(&self) -> Option<&Value> {
        if let Some(value) = &self.json {
            return Some(value);
        }
        self.parsed_json
            .get_or_init(|| {
                let bytes = self.body.as_bytes()?;
                match serde_json::from_slice(bytes) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        logger::log_json_parse_failed(&e, bytes);
                        None
                    }
                }
            })
            .as_ref()
    }

    // -------------------------------------------------------------------------
    // Caching
    // -------------------------------------------------------------------------

    pub const fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Render once and reuse the bytes, patching only the `Date` field
    ///
    /// The snapshot is taken with the context of the first render; a cached
    /// response keeps that context's banner until it is mutated.
    pub fn set_cacheable(&mut self, cacheable: bool) {
        self.invalidate();
        self.cacheable = cacheable;
    }

    pub fn cache_state(&self, server: &ServerContext) -> CacheState {
        self.render_cache.state(server.clock().now_secs())
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.render_cache.snapshot()
    }

    /// Reset to the state of a freshly constructed, status-less response
    pub fn clear(&mut self) {
        *self = Self::with_status(StatusCode::Other(0), ContentType::TextHtml);
    }

    fn invalidate(&mut self) {
        self.json_body.take();
        self.header_block.take();
        self.render_cache.invalidate();
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Complete wire bytes: head, cookies, `Date`, then the in-memory body
    ///
    /// Direct-transfer files are not included; send [`Self::sendfile_path`]
    /// after these bytes.
    pub fn render(&self, server: &ServerContext) -> Result<Bytes> {
        self.render_snapshot(server).map(|snapshot| snapshot.bytes)
    }

    /// Like [`Self::render`], also returning the `Content-Length` written
    /// into the head
    ///
    /// For direct-transfer files this is the size observed at render time;
    /// the transport must send exactly that many bytes.
    pub fn render_with_length(&self, server: &ServerContext) -> Result<(Bytes, u64)> {
        self.render_snapshot(server)
            .map(|snapshot| (snapshot.bytes, snapshot.content_length))
    }

    /// Head for a HEAD request: no body, never served from the snapshot
    pub fn render_head(&self, server: &ServerContext) -> Result<Bytes> {
        let block = self.header_block(server)?;
        let mut out = BytesMut::with_capacity(block.head.len() + 64);
        out.extend_from_slice(&block.head);
        serializer::write_cookies(&mut out, self);
        serializer::write_date(&mut out, date_for(server));
        Ok(out.freeze())
    }

    fn render_snapshot(&self, server: &ServerContext) -> Result<Snapshot> {
        let now = server.clock().now();
        if self.cacheable {
            return self
                .render_cache
                .get_or_render(now, |now| self.render_fresh(server, now));
        }
        self.render_fresh(server, now)
    }

    fn render_fresh(&self, server: &ServerContext, now: DateTime<Utc>) -> Result<Snapshot> {
        let block = self.header_block(server)?;
        let body = self.body_bytes().unwrap_or_default();

        let mut out = BytesMut::with_capacity(block.head.len() + 128 + body.len());
        out.extend_from_slice(&block.head);
        serializer::write_cookies(&mut out, self);
        let date = server.config().http.send_date_header.then_some(now);
        let date_offset = serializer::write_date(&mut out, date);
        out.extend_from_slice(body);
        Ok(Snapshot {
            bytes: out.freeze(),
            date_offset,
            content_length: block.content_length,
            second: now.timestamp(),
        })
    }

    /// Cached header block, rebuilt after any mutation
    ///
    /// Blocks for direct-transfer files are never cached so the length is
    /// re-read from disk on every render. A block built under a different
    /// server banner is not reused.
    fn header_block(&self, server: &ServerContext) -> Result<HeaderBlock> {
        let banner = server.server_header_line();
        if let Some((built_with, block)) = self.header_block.get() {
            if built_with == banner {
                return Ok(block.clone());
            }
        }
        let block = serializer::build_header_block(self, banner)?;
        if self.json.is_some() || self.body.file_path().is_none() {
            let _ = self.header_block.set((banner.to_string(), block.clone()));
        }
        Ok(block)
    }
}

fn date_for(server: &ServerContext) -> Option<DateTime<Utc>> {
    server
        .config()
        .http
        .send_date_header
        .then(|| server.clock().now())
}
