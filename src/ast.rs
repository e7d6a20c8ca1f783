//! # Chat Expression Language - Syntax Tree
//!
//! This module defines the tokens and the concrete syntax tree (CST) of the
//! expression language embedded in chat responses and command conditions.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - The two arithmetic operator classes
//! - **[expressions]** - One node type per grammar rule
//!
//! ## Quick Start
//!
//! ```text
//! ${sender.getFollowAge()}
//! levels.moderator in user.getLevels() and channel.title matches "/x/"
//! ```
//!
//! ## Grammar
//!
//! Lowest to highest binding:
//!
//! ```text
//! expression         := orExpression
//! orExpression       := andExpression ( "or" andExpression )*
//! andExpression      := additionExpression ( "and" additionExpression )*
//! additionExpression := multiplicationExpression ( AdditionOp multiplicationExpression )*
//! multiplicationExpr := inExpression ( MultiplicationOp inExpression )*
//! inExpression       := matchesExpression ( "in" matchesExpression )?
//! matchesExpression  := notExpression ( "matches" notExpression )?
//! notExpression      := "not" notExpression | valueExpression
//! valueExpression    := String | Number | Boolean | array | dotNotation | "(" expression ")"
//! array              := "[" (valueExpression ("," valueExpression)*)? "]"
//! dotNotation        := Identifier ( objectAccess | arrayAccess | functionCall )*
//! objectAccess       := "." Identifier
//! arrayAccess        := "[" valueExpression "]"
//! functionCall       := "(" (valueExpression ("," valueExpression)*)? ")"
//! ```
//!
//! `in` and `matches` are non-associative; `a in b in c` is a syntax error.
//! Precedence follows from the nesting of the rules above, so `1 + 2 * 3`
//! is `7` without any separate precedence table.
//!
//! ## Boolean Operators Do Not Short-Circuit
//!
//! Every operand of `and`/`or` is evaluated, in source order, even after the
//! result is already known. Operands may call functions with side effects and
//! those effects always happen.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{
    AdditionExpression, AndExpression, ArrayLiteral, DotNotation, Expression, InExpression,
    MatchesExpression, MultiplicationExpression, NotExpression, OrExpression, Postfix,
    ValueExpression,
};
pub use operators::{AdditionOp, MultiplicationOp};
pub use tokens::{Token, TokenKind};
