//! Bridging between expression values and `serde_json`.
//!
//! JSON enters through invocation contexts and `fetchJson`, and leaves through
//! the JSON printers in [`output`](crate::output).

use serde_json::{Map, Number};

use crate::value::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            Json::String(s) => Value::String(s),
            Json::Array(items) => items.into_iter().map(Value::from).collect::<Vec<_>>().into(),
            Json::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, Value::from(field)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    /// Functions and non-finite floats have no JSON form and become `null`.
    fn from(value: &Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Value::Null | Value::Function(_) => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Integer(n) => Json::Number(Number::from(*n)),
            Value::Float(n) => Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Json::from).collect()),
            Value::Object(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(key, field)| (key.clone(), Json::from(field)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

pub fn json_to_value(json: serde_json::Value) -> Value {
    Value::from(json)
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    serde_json::Value::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_numbers_keep_integer_distinction() {
        let value = json_to_value(json!({"a": 1, "b": 1.5, "c": [true, null]}));
        let Value::Object(obj) = value else {
            panic!("expected object");
        };
        assert_eq!(obj["a"], Value::Integer(1));
        assert_eq!(obj["b"], Value::Float(1.5));
        assert_eq!(
            obj["c"],
            Value::Array(vec![Value::Boolean(true), Value::Null])
        );
    }

    #[test]
    fn test_values_without_json_form_become_null() {
        let f = crate::Function::new(|_| Ok(Value::Null));
        assert_eq!(value_to_json(&Value::Function(f)), json!(null));
        assert_eq!(value_to_json(&Value::Float(f64::NAN)), json!(null));
        assert_eq!(
            value_to_json(&Value::Array(vec![Value::Integer(2), Value::Float(0.5)])),
            json!([2, 0.5])
        );
    }
}
