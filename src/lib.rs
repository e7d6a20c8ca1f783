pub mod ast;
pub mod builtins;
#[cfg(feature = "cli")]
pub mod cli;
pub mod context;
pub mod convert;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod template;
pub mod value;

pub use ast::{Expression, Token, TokenKind};
pub use context::{Context, ContextLayer, Layer};
pub use engine::{Engine, EngineConfig};
pub use error::{CallError, EvalError, EvaluateError, SyntaxError, SyntaxErrors};
pub use evaluator::Interpreter;
pub use lexer::{Lexer, Tokens};
pub use output::{render_text, to_json, to_json_pretty};
pub use parser::{ParseOutcome, Parser};
pub use value::{Call, Function, Object, Value};
