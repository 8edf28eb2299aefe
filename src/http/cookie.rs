//! Cookie codec
//!
//! Parses `Set-Cookie` header values into [`Cookie`] records and writes them
//! back out as wire lines. Parsing is best effort: malformed segments are
//! trimmed and kept or skipped, never rejected.

use chrono::{DateTime, Utc};

use super::date::{format_http_date, parse_http_date};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cookie {
    pub key: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub const fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub const fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Parse the value part of a `Set-Cookie` header
    ///
    /// Returns `None` when the cookie name comes out empty.
    ///
    /// # Examples
    /// ```
    /// use rust_http_response::http::cookie::Cookie;
    /// let cookie = Cookie::parse("id=42; Path=/; Secure; HttpOnly").unwrap();
    /// assert_eq!(cookie.key, "id");
    /// assert_eq!(cookie.path.as_deref(), Some("/"));
    /// assert!(cookie.secure && cookie.http_only);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let mut segments = value.split(';');
        let (key, val) = split_pair(segments.next().unwrap_or_default());
        let mut cookie = Self::new(key, val);

        for segment in segments {
            let (name, val) = split_pair(segment);
            match name.to_ascii_lowercase().as_str() {
                "path" => cookie.path = Some(val.to_string()),
                "domain" => cookie.domain = Some(val.to_string()),
                "expires" => cookie.expires = parse_http_date(val),
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                _ => {}
            }
        }

        if cookie.key.is_empty() {
            None
        } else {
            Some(cookie)
        }
    }

    /// Full `Set-Cookie` line including the trailing CRLF
    pub fn to_header_line(&self) -> String {
        let mut line = format!("Set-Cookie: {}={}", self.key, self.value);
        if let Some(path) = &self.path {
            line.push_str("; Path=");
            line.push_str(path);
        }
        if let Some(domain) = &self.domain {
            line.push_str("; Domain=");
            line.push_str(domain);
        }
        if let Some(expires) = self.expires {
            line.push_str("; Expires=");
            line.push_str(&format_http_date(expires));
        }
        if self.secure {
            line.push_str("; Secure");
        }
        if self.http_only {
            line.push_str("; HttpOnly");
        }
        line.push_str("\r\n");
        line
    }
}

/// Split a trimmed `name[=value]` segment; a missing `=` yields an empty value
fn split_pair(segment: &str) -> (&str, &str) {
    let segment = segment.trim();
    match segment.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (segment, ""),
    }
}
