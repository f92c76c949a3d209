//! Web page fetching tool

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use tracing::debug;

use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const WEB_FETCH: &str = "web_fetch";

const FETCH_TIMEOUT_SECS: u64 = 30;
const MAX_BODY_CHARS: usize = 50_000;

pub fn web_fetch_spec() -> ToolSpec {
    ToolSpec::new(WEB_FETCH, "Web Fetch")
        .with_instructions(
            "Fetch a web page or API endpoint over HTTPS and return its \
content. HTML is reduced to readable text; JSON, XML, and plain text are \
returned as-is. Plain http URLs are upgraded to https.",
        )
        .with_parameter(ToolParameter::new(
            "url",
            true,
            "The URL to fetch (http or https)",
            "https://example.com",
        ))
}

pub struct WebFetchHandler {
    client: reqwest::Client,
}

impl WebFetchHandler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebFetchHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for WebFetchHandler {
    fn tool_id(&self) -> &str {
        WEB_FETCH
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let url = match params.require_str("url") {
            Ok(url) => url,
            Err(e) => return ToolResult::err(e),
        };
        let url = match normalize_url(&url) {
            Ok(url) => url,
            Err(e) => return ToolResult::err(e),
        };
        debug!(url = %url, "Fetching URL");

        let response = match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return ToolResult::err(format!(
                    "Request timed out after {} seconds",
                    FETCH_TIMEOUT_SECS
                ));
            }
            Err(e) => return ToolResult::err(format!("Failed to fetch {}: {}", url, e)),
        };

        let status = response.status();
        if !status.is_success() {
            return ToolResult::err(format!("Request to {} failed with status {}", url, status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ToolResult::err(format!("Failed to read response body: {}", e)),
        };

        let text = if content_type.contains("text/html") {
            html_to_text(&body)
        } else if content_type.contains("json")
            || content_type.contains("xml")
            || content_type.starts_with("text/")
            || content_type.is_empty()
        {
            body
        } else {
            return ToolResult::err(format!("Unsupported content type: {}", content_type));
        };

        let mut text = text;
        if text.len() > MAX_BODY_CHARS {
            let mut end = MAX_BODY_CHARS;
            while end > 0 && !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
            text.push_str("\n\n(content truncated)");
        }
        ToolResult::ok(text)
    }
}

/// Validate the scheme and upgrade http to https
fn normalize_url(url: &str) -> Result<String, String> {
    if let Some(rest) = url.strip_prefix("http://") {
        Ok(format!("https://{}", rest))
    } else if url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(format!("Invalid URL (must be http or https): {}", url))
    }
}

/// Strip markup down to readable text, dropping script and style bodies
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<String> = Vec::new();
    collect_text(document.root_element(), &mut parts);
    parts.join("\n")
}

fn collect_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    if matches!(element.value().name(), "script" | "style" | "noscript") {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, parts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("http://example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert!(normalize_url("ftp://example.com").is_err());
        assert!(normalize_url("example.com").is_err());
    }

    #[test]
    fn test_html_to_text_strips_script() {
        let html = "<html><body><h1>Title</h1><script>var x = 1;</script><p>Hello</p></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("Title"));
        assert!(text.contains("Hello"));
        assert!(!text.contains("var x"));
    }

    #[tokio::test]
    async fn test_missing_url_param() {
        let handler = WebFetchHandler::new();
        let result = handler.execute(&ToolParams::new()).await;
        assert_eq!(
            result.error.as_deref().unwrap(),
            "Missing required parameter: url"
        );
    }
}
