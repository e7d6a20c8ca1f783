//! Network helpers: `fetchText`, `fetchJson` and `fetchHtml`.
//!
//! Every failure is logged and returned as a readable string value.

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    convert::json_to_value, engine::EngineConfig, evaluator::compile_pattern, value::Value,
};

/// Shared HTTP client for the fetch built-ins.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

fn url_argument<'v>(args: &'v [Value], name: &str) -> Result<&'v str, Value> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| Value::String(format!("{} expects a URL", name)))
}

fn failure(url: &str, reason: impl std::fmt::Display) -> Value {
    warn!(%url, %reason, "fetch failed");
    Value::String(format!("Could not fetch {}: {}", url, reason))
}

impl Fetcher {
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not configure HTTP client, using defaults");
                reqwest::Client::new()
            });
        Fetcher { client }
    }

    async fn get(&self, url: &str) -> Result<String, reqwest::Error> {
        debug!(%url, "fetching");
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// `fetchText(url)`: the response body, trimmed.
    pub async fn fetch_text(&self, args: &[Value]) -> Value {
        let url = match url_argument(args, "fetchText") {
            Ok(url) => url,
            Err(message) => return message,
        };
        match self.get(url).await {
            Ok(body) => Value::String(body.trim().to_string()),
            Err(e) => failure(url, e),
        }
    }

    /// `fetchJson(url)`: the response body parsed as JSON.
    pub async fn fetch_json(&self, args: &[Value]) -> Value {
        let url = match url_argument(args, "fetchJson") {
            Ok(url) => url,
            Err(message) => return message,
        };
        let body = match self.get(url).await {
            Ok(body) => body,
            Err(e) => return failure(url, e),
        };
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => json_to_value(json),
            Err(e) => failure(url, format!("invalid JSON: {}", e)),
        }
    }

    /// `fetchHtml(url, pattern)`: text of the first fragment matching `pattern`.
    pub async fn fetch_html(&self, args: &[Value]) -> Value {
        let url = match url_argument(args, "fetchHtml") {
            Ok(url) => url,
            Err(message) => return message,
        };
        let Some(pattern) = args.get(1).and_then(Value::as_str) else {
            return Value::from("fetchHtml expects a URL and a pattern");
        };
        let regex = match compile_pattern(pattern) {
            Ok(regex) => regex,
            Err(e) => return Value::String(format!("Invalid pattern: {}", e)),
        };
        match self.get(url).await {
            Ok(html) => Value::String(extract_fragment(&html, &regex)),
            Err(e) => failure(url, e),
        }
    }
}

/// First match of `regex` in `html` (capture group 1 when the pattern has
/// one), with tags removed and whitespace collapsed. Empty when nothing
/// matches.
pub fn extract_fragment(html: &str, regex: &Regex) -> String {
    let Some(captures) = regex.captures(html) else {
        return String::new();
    };
    let fragment = captures
        .get(1)
        .or_else(|| captures.get(0))
        .map(|m| m.as_str())
        .unwrap_or_default();
    strip_tags(fragment)
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fragment_uses_first_group() {
        let html = "<html><h1 class=\"t\">Hello <b>chat</b> &amp; friends</h1></html>";
        let regex = compile_pattern("<h1[^>]*>(.*?)</h1>").unwrap();
        assert_eq!(extract_fragment(html, &regex), "Hello chat & friends");
    }

    #[test]
    fn test_extract_fragment_without_group_or_match() {
        let html = "<p>one</p><p>two</p>";
        let regex = compile_pattern("<p>.*?</p>").unwrap();
        assert_eq!(extract_fragment(html, &regex), "one");

        let regex = compile_pattern("<table>").unwrap();
        assert_eq!(extract_fragment(html, &regex), "");
    }
}
