//! Rendering of values for chat output and for JSON.
//!
//! [`render_text`] is what ends up in a chat message: strings verbatim,
//! arrays joined with `", "`, objects as compact JSON. JSON output is
//! deterministic because objects are ordered maps.
//!
//! # Examples
//!
//! ```
//! use chat_expr::Value;
//! use chat_expr::output::{render_text, to_json};
//!
//! let value = Value::Array(vec![Value::from("a"), Value::Integer(2)]);
//!
//! assert_eq!(render_text(&value), "a, 2");
//! assert_eq!(to_json(&value), "[\"a\",2]");
//! ```

use crate::{convert::value_to_json, value::Value};

/// Compact JSON.
pub fn to_json(value: &Value) -> String {
    value_to_json(value).to_string()
}

/// Pretty JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    format!("{:#}", value_to_json(value))
}

/// Text shown in chat for an evaluated value.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => to_json(value),
        Value::Function(_) => "[function]".to_string(),
    }
}
