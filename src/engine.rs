//! The entry point used by the rest of the bot.
//!
//! An [`Engine`] owns the process-lifetime state: the built-in functions and
//! the registered context layers. Layers are registered during startup
//! through `&mut self`; afterwards the engine is shared (typically in an
//! `Arc`) and only read, so concurrent evaluations need no locking.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, error};

use crate::{
    builtins,
    context::{Context, ContextLayer, Layer},
    error::{EvalError, EvaluateError},
    evaluator::Interpreter,
    output::render_text,
    parser,
    template::{self, Segment},
    value::Value,
};

/// Shown instead of a result when the expression does not parse.
pub const SYNTAX_ERROR_MESSAGE: &str = "Could not evaluate expression";

/// Shown instead of a result when a callable failed unexpectedly.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred while evaluating the expression";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sent with every request made by the fetch built-ins.
    pub user_agent: String,
    /// Per-request timeout for the fetch built-ins.
    pub fetch_timeout: Duration,
    /// Answers `eightBall()` picks from.
    pub eight_ball_answers: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            user_agent: concat!("chat-expr/", env!("CARGO_PKG_VERSION")).to_string(),
            fetch_timeout: Duration::from_secs(10),
            eight_ball_answers: [
                "It is certain.",
                "It is decidedly so.",
                "Without a doubt.",
                "Yes, definitely.",
                "You may rely on it.",
                "As I see it, yes.",
                "Most likely.",
                "Outlook good.",
                "Yes.",
                "Signs point to yes.",
                "Reply hazy, try again.",
                "Ask again later.",
                "Better not tell you now.",
                "Cannot predict now.",
                "Concentrate and ask again.",
                "Don't count on it.",
                "My reply is no.",
                "My sources say no.",
                "Outlook not so good.",
                "Very doubtful.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Evaluates expressions against layered per-invocation contexts.
///
/// # Examples
///
/// ```
/// use chat_expr::{Engine, EngineConfig, Object, Value};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.register_context_layer(|_: &Value| {
///     let mut layer = Object::new();
///     layer.insert("botName".to_string(), Value::from("chatty"));
///     layer
/// });
///
/// let result = engine.evaluate("botName", &Value::Null).await;
/// assert_eq!(result, Value::from("chatty"));
/// # });
/// ```
pub struct Engine {
    config: EngineConfig,
    layers: Vec<Layer>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let library = builtins::standard_library(&config, Instant::now());
        Engine {
            config,
            layers: vec![Layer::Static(library), Layer::Invocation],
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Append a layer. Later registrations override earlier ones key by key.
    pub fn register_context_layer<L>(&mut self, resolver: L)
    where
        L: ContextLayer + 'static,
    {
        self.layers.push(Layer::Resolver(Arc::new(resolver)));
    }

    /// Build the merged context for one invocation.
    pub fn context_for(&self, invocation: &Value) -> Context {
        Context::assemble(&self.layers, invocation)
    }

    /// Parse and interpret `source`, reporting failures as typed errors.
    ///
    /// Syntax errors stop here; a tree with errors is never interpreted.
    pub async fn try_evaluate(
        &self,
        source: &str,
        invocation: &Value,
    ) -> Result<Value, EvaluateError> {
        let started = Instant::now();
        debug!(%source, "evaluating expression");

        let tree = parser::parse(source)?;
        let context = self.context_for(invocation);
        let result = Interpreter::new(&context).interpret(&tree).await;

        debug!(%source, elapsed = ?started.elapsed(), ok = result.is_ok(), "evaluation finished");
        Ok(result?)
    }

    /// Evaluate `source`; every failure becomes a user-facing string value.
    pub async fn evaluate(&self, source: &str, invocation: &Value) -> Value {
        match self.try_evaluate(source, invocation).await {
            Ok(value) => value,
            Err(EvaluateError::Syntax(errors)) => {
                debug!(%source, %errors, "expression has syntax errors");
                Value::from(SYNTAX_ERROR_MESSAGE)
            }
            Err(EvaluateError::Eval(e @ EvalError::Failed { .. })) => {
                error!(%source, error = %e, "expression evaluation failed unexpectedly");
                Value::from(INTERNAL_ERROR_MESSAGE)
            }
            Err(EvaluateError::Eval(e)) => Value::String(e.to_string()),
        }
    }

    /// Replace every `${...}` span of `template` with its evaluated text.
    /// Spans are evaluated one after another, left to right.
    pub async fn render(&self, template: &str, invocation: &Value) -> String {
        let mut out = String::with_capacity(template.len());
        for segment in template::split(template) {
            match segment {
                Segment::Text(text) => out.push_str(&text),
                Segment::Expression(source) => {
                    let value = self.evaluate(&source, invocation).await;
                    out.push_str(&render_text(&value));
                }
            }
        }
        out
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}
