//! Error taxonomy for tokenizing, parsing and evaluating expressions.
//!
//! Every variant carries the 1-based source column of the token that caused it.
//! None of these types escape [`Engine::evaluate`](crate::Engine::evaluate);
//! that boundary turns them into user-facing strings.

use std::fmt;

use thiserror::Error;

/// A malformed character or token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, column: usize) -> Self {
        SyntaxError {
            message: message.into(),
            column,
        }
    }
}

/// All syntax errors collected while tokenizing and parsing one source string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Errors raised while interpreting a syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// An identifier or property name is not present
    #[error("Unknown key '{key}' at column {column}")]
    UnknownKey { key: String, column: usize },

    /// An array index outside `[0, length)`
    #[error("Index {index} is out of bounds for an array of length {length} at column {column}")]
    OutOfBounds {
        index: i64,
        length: usize,
        column: usize,
    },

    /// An operand of the wrong runtime type
    #[error("{message} at column {column}")]
    IllegalState { message: String, column: usize },

    /// Unexpected failure inside a callable
    #[error("Call failed at column {column}: {message}")]
    Failed { message: String, column: usize },
}

impl EvalError {
    pub fn illegal_state(message: impl Into<String>, column: usize) -> Self {
        EvalError::IllegalState {
            message: message.into(),
            column,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            EvalError::UnknownKey { column, .. }
            | EvalError::OutOfBounds { column, .. }
            | EvalError::IllegalState { column, .. }
            | EvalError::Failed { column, .. } => *column,
        }
    }
}

/// Failure reported by a [`Function`](crate::Function).
///
/// Callables do not know where they were called from; the interpreter attaches
/// the column of the call when it converts these into [`EvalError`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The arguments had the wrong shape; becomes [`EvalError::IllegalState`]
    #[error("{0}")]
    IllegalArgument(String),

    /// Anything else; becomes [`EvalError::Failed`]
    #[error("{0}")]
    Failed(String),
}

impl CallError {
    pub fn at(self, column: usize) -> EvalError {
        match self {
            CallError::IllegalArgument(message) => EvalError::IllegalState { message, column },
            CallError::Failed(message) => EvalError::Failed { message, column },
        }
    }
}

/// Outcome of [`Engine::try_evaluate`](crate::Engine::try_evaluate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluateError {
    #[error("{0}")]
    Syntax(#[from] SyntaxErrors),

    #[error("{0}")]
    Eval(#[from] EvalError),
}
