//! Canned pages and request bodies.

use serde_json::{json, Value};

pub const PAGE1_URL: &str = "https://example.com/page1";
pub const PAGE2_URL: &str = "https://example.com/page2";

pub const PAGE1_HTML: &str =
    r#"<html><body><div class="page-title">Page 1 Title</div><p>Body</p></body></html>"#;
pub const PAGE2_HTML: &str =
    r#"<html><body><div class="header">Header Content</div></body></html>"#;

/// One task entry as the API expects it.
pub fn task(url: &str, selector: &str) -> Value {
    json!({"url": url, "selectors": {"selector": selector}})
}

/// A create-job body with the given task entries.
pub fn create_body(tasks: Vec<Value>) -> Value {
    json!({ "tasks": tasks })
}
