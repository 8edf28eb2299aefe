//! View rendering contract
//!
//! The templating engine is pluggable; responses only need
//! `render(name, data) -> text`. The built-in renderer knows the default
//! not-found page.

use serde_json::{Map, Value};

/// Template data keyed by variable name
pub type ViewData = Map<String, Value>;

/// Name of the built-in not-found view
pub const NOT_FOUND_VIEW: &str = "NotFound";

pub trait ViewRenderer: Send + Sync {
    /// Render a view, `None` when no view with this name exists
    fn render(&self, name: &str, data: &ViewData) -> Option<String>;
}

/// Renderer that only knows the built-in pages
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinViews;

impl ViewRenderer for BuiltinViews {
    fn render(&self, name: &str, data: &ViewData) -> Option<String> {
        (name == NOT_FOUND_VIEW).then(|| not_found_page(data))
    }
}

fn not_found_page(data: &ViewData) -> String {
    let version = data
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(env!("CARGO_PKG_VERSION"));
    format!(
        r#"<html>
<head><title>404 Not Found</title></head>
<body bgcolor="white">
<center><h1>404 Not Found</h1></center>
<hr><center>rust_http_response/{version}</center>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page_carries_version() {
        let mut data = ViewData::new();
        data.insert("version".to_string(), Value::from("9.9.9"));
        let page = BuiltinViews.render(NOT_FOUND_VIEW, &data).unwrap();
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("rust_http_response/9.9.9"));
    }

    #[test]
    fn test_unknown_view() {
        assert_eq!(BuiltinViews.render("Missing", &ViewData::new()), None);
    }
}
