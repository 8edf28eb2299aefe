//! HTTP response building module
//!
//! Factory functions for the common response kinds. Builders that can fail
//! (files, views) never return an error: they degrade to the not-found
//! response instead, which is why they hand out shared pointers.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::body::Body;
use super::mime::ContentType;
use super::response::{HttpResponse, HttpResponsePtr};
use super::status::StatusCode;
use crate::context::{CallContext, ServerContext};
use crate::error::Result;
use crate::logger;
use crate::view::{BuiltinViews, ViewData, ViewRenderer, NOT_FOUND_VIEW};

/// Build default `200 OK` HTML response with an empty body
pub fn build_default_response() -> HttpResponse {
    HttpResponse::new()
}

/// Build JSON response from a structured value
pub fn build_json_response(value: Value) -> HttpResponse {
    HttpResponse::json(value)
}

/// Build JSON response from any serializable value
pub fn build_json_response_from<T: Serialize>(value: &T) -> Result<HttpResponse> {
    Ok(HttpResponse::json(serde_json::to_value(value)?))
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> HttpResponse {
    build_redirect_response_with_code(target, StatusCode::Found)
}

/// Build redirect response with a specific status code
pub fn build_redirect_response_with_code(target: &str, status: StatusCode) -> HttpResponse {
    HttpResponse::redirect(target, status)
}

/// Build HTML response from a named view
///
/// Unknown views fall back to the not-found response.
pub fn build_view_response<'a>(
    ctx: impl Into<CallContext<'a>>,
    view: &str,
    data: &ViewData,
) -> HttpResponsePtr {
    let ctx = ctx.into();
    match ctx.server().views().render(view, data) {
        Some(text) => {
            let mut resp = HttpResponse::new();
            resp.set_body(text);
            Arc::new(resp)
        }
        None => {
            logger::log_missing_view(view);
            build_not_found_response(ctx)
        }
    }
}

/// Build response serving a file from disk
///
/// Content type comes from `content_type`, else the attachment name's
/// extension, else the path's extension. A file that cannot be opened
/// yields the not-found response.
pub fn build_file_response<'a>(
    ctx: impl Into<CallContext<'a>>,
    path: impl AsRef<Path>,
    attachment: Option<&str>,
    content_type: Option<ContentType>,
) -> HttpResponsePtr {
    let ctx = ctx.into();
    let path = path.as_ref();
    let attachment = attachment.filter(|name| !name.is_empty());

    let body = match Body::from_file(path, &ctx.server().config().http) {
        Ok(body) => body,
        Err(e) => {
            logger::log_file_open_failed(path, &e);
            return build_not_found_response(ctx);
        }
    };

    let content_type = content_type.unwrap_or_else(|| match attachment {
        Some(name) => ContentType::from_path(name),
        None => ContentType::from_path(path),
    });

    let mut resp = HttpResponse::new();
    resp.set_body_source(body);
    resp.set_content_type(content_type);
    if let Some(name) = attachment {
        resp.add_header("Content-Disposition", format!("attachment; filename={name}"));
    }
    Arc::new(resp)
}

/// Build 404 Not Found response
///
/// Worker threads share one cached page each (or the application's custom
/// page). Anyone else gets a private copy they may mutate freely.
pub fn build_not_found_response<'a>(ctx: impl Into<CallContext<'a>>) -> HttpResponsePtr {
    let ctx = ctx.into();
    let server = ctx.server();
    let worker = ctx.worker();

    if let Some(custom) = server.custom_not_found() {
        return match worker {
            Some(_) => Arc::clone(custom),
            None => Arc::new(HttpResponse::clone(custom)),
        };
    }

    match worker {
        Some(worker) => {
            logger::log_cached_not_found(worker.index());
            Arc::clone(worker.cached_not_found())
        }
        None => Arc::new(render_not_found(server)),
    }
}

/// Not-found page marked for snapshot reuse, one per worker
pub(crate) fn build_cacheable_not_found(server: &ServerContext) -> HttpResponse {
    let mut resp = render_not_found(server);
    resp.set_cacheable(true);
    resp
}

fn render_not_found(server: &ServerContext) -> HttpResponse {
    let mut data = ViewData::new();
    data.insert("version".to_string(), Value::from(env!("CARGO_PKG_VERSION")));

    let text = server
        .views()
        .render(NOT_FOUND_VIEW, &data)
        .or_else(|| BuiltinViews.render(NOT_FOUND_VIEW, &data))
        .unwrap_or_default();

    let mut resp = HttpResponse::with_status(StatusCode::NotFound, ContentType::TextHtml);
    resp.set_body(text);
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::WorkerContext;
    use std::io::Write;

    fn server() -> Arc<ServerContext> {
        let mut config = Config::default();
        config.server.workers = 2;
        config.http.sendfile_threshold = 16;
        Arc::new(ServerContext::new(config))
    }

    #[test]
    fn test_file_response_content_type_resolution() {
        let server = server();
        let mut file = tempfile::Builder::new().suffix(".css").tempfile().unwrap();
        file.write_all(b"body{}").unwrap();

        let plain = build_file_response(&*server, file.path(), None, None);
        assert_eq!(plain.content_type(), &ContentType::TextCss);
        assert_eq!(plain.body_bytes(), Some(&b"body{}"[..]));

        let attached = build_file_response(&*server, file.path(), Some("report.pdf"), None);
        assert_eq!(attached.content_type(), &ContentType::ApplicationPdf);
        assert_eq!(
            attached.header("Content-Disposition"),
            Some("attachment; filename=report.pdf")
        );

        let forced = build_file_response(
            &*server,
            file.path(),
            Some("report.pdf"),
            Some(ContentType::TextPlain),
        );
        assert_eq!(forced.content_type(), &ContentType::TextPlain);
    }

    #[test]
    fn test_missing_file_degrades_to_not_found() {
        let server = server();
        let dir = tempfile::tempdir().unwrap();
        let resp = build_file_response(&*server, dir.path().join("nope.html"), None, None);
        let reference = build_not_found_response(&*server);
        assert_eq!(resp.status_code(), StatusCode::NotFound);
        assert_eq!(resp.content_type(), reference.content_type());
    }

    #[test]
    fn test_worker_shares_cached_not_found() {
        let server = server();
        let worker = WorkerContext::new(1, Arc::clone(&server));
        let a = build_not_found_response(&worker);
        let b = build_not_found_response(&worker);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_cacheable());

        let outsider = WorkerContext::new(7, Arc::clone(&server));
        let c = build_not_found_response(&outsider);
        let d = build_not_found_response(&outsider);
        assert!(!Arc::ptr_eq(&c, &d));
        assert!(!c.is_cacheable());
    }

    #[test]
    fn test_custom_not_found_cloned_off_worker() {
        let mut page = HttpResponse::with_status(StatusCode::NotFound, ContentType::TextPlain);
        page.set_body("gone fishing");
        let mut config = Config::default();
        config.server.workers = 1;
        let server = Arc::new(ServerContext::new(config).with_custom_not_found(page));
        let worker = WorkerContext::new(0, Arc::clone(&server));

        let shared = build_not_found_response(&worker);
        assert!(Arc::ptr_eq(&shared, server.custom_not_found().unwrap()));

        let private = build_not_found_response(&*server);
        assert!(!Arc::ptr_eq(&private, server.custom_not_found().unwrap()));
        assert_eq!(private.body_bytes(), Some(&b"gone fishing"[..]));
    }

    #[test]
    fn test_unknown_view_degrades_to_not_found() {
        let server = server();
        let resp = build_view_response(&*server, "NoSuchView", &ViewData::new());
        assert_eq!(resp.status_code(), StatusCode::NotFound);
    }

    #[test]
    fn test_json_response_from_serializable() {
        #[derive(Serialize)]
        struct Health {
            status: &'static str,
        }
        let resp = build_json_response_from(&Health { status: "ok" }).unwrap();
        assert_eq!(resp.content_type(), &ContentType::ApplicationJson);
        assert_eq!(resp.json_object(), Some(&serde_json::json!({ "status": "ok" })));
    }

    #[test]
    fn test_redirect_defaults_to_found() {
        let resp = build_redirect_response("/next");
        assert_eq!(resp.status_code(), StatusCode::Found);
        assert_eq!(resp.header("location"), Some("/next"));
    }
}
