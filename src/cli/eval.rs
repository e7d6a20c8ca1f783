//! Evaluate expressions and render templates against a JSON context

use crate::{Engine, Value, convert::json_to_value, output};

use super::CliError;

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON invocation context
    pub context: Option<String>,
    /// Print the result as JSON instead of chat text
    pub json: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Parse the invocation context; no context means an empty object
pub fn parse_context(context: Option<&str>) -> Result<Value, CliError> {
    match context {
        Some(text) if !text.trim().is_empty() => {
            let json: serde_json::Value = serde_json::from_str(text)?;
            Ok(json_to_value(json))
        }
        _ => Ok(Value::Object(Default::default())),
    }
}

/// Evaluate an expression, failing on syntax or evaluation errors
pub async fn execute_eval(engine: &Engine, options: &EvalOptions) -> Result<String, CliError> {
    let invocation = parse_context(options.context.as_deref())?;
    let value = engine.try_evaluate(&options.expression, &invocation).await?;

    Ok(match (options.json, options.pretty) {
        (true, true) => output::to_json_pretty(&value),
        (true, false) => output::to_json(&value),
        (false, _) => output::render_text(&value),
    })
}

/// Render a template; failing spans are replaced by their error text
pub async fn execute_render(
    engine: &Engine,
    template: &str,
    context: Option<&str>,
) -> Result<String, CliError> {
    let invocation = parse_context(context)?;
    Ok(engine.render(template, &invocation).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_eval_with_context() {
        let engine = Engine::default();
        let options = EvalOptions {
            expression: "user.name + \"!\"".into(),
            context: Some(r#"{"user": {"name": "ada"}}"#.into()),
            ..Default::default()
        };
        assert_eq!(execute_eval(&engine, &options).await.unwrap(), "ada!");
    }

    #[tokio::test]
    async fn test_execute_eval_json_output() {
        let engine = Engine::default();
        let options = EvalOptions {
            expression: "[1, \"a\"]".into(),
            json: true,
            ..Default::default()
        };
        assert_eq!(execute_eval(&engine, &options).await.unwrap(), "[1,\"a\"]");
    }

    #[tokio::test]
    async fn test_invalid_context_is_reported() {
        let engine = Engine::default();
        let options = EvalOptions {
            expression: "1".into(),
            context: Some("{not json".into()),
            ..Default::default()
        };
        assert!(matches!(
            execute_eval(&engine, &options).await,
            Err(CliError::Json(_))
        ));
    }
}
