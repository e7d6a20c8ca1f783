//! CLI support for chat-expr
//!
//! Provides programmatic access to the `chatexpr` commands so they can be
//! driven from tests or embedded in other tools.

mod check;
mod eval;

pub use check::{CheckResult, execute_check, list_tokens};
pub use eval::{EvalOptions, execute_eval, execute_render, parse_context};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Syntax(#[from] crate::SyntaxErrors),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Invalid JSON context: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<crate::EvaluateError> for CliError {
    fn from(e: crate::EvaluateError) -> Self {
        match e {
            crate::EvaluateError::Syntax(errors) => CliError::Syntax(errors),
            crate::EvaluateError::Eval(error) => CliError::Eval(error),
        }
    }
}
