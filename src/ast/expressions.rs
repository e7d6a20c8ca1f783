//! Concrete syntax tree nodes.
//!
//! Every node corresponds to exactly one grammar rule and keeps the tokens it
//! was built from so evaluation errors can point back at a column.

use crate::ast::Token;

/// `expression := orExpression`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub or: OrExpression,
}

/// `orExpression := andExpression ( "or" andExpression )*`
#[derive(Debug, Clone, PartialEq)]
pub struct OrExpression {
    pub first: AndExpression,
    pub rest: Vec<(Token, AndExpression)>,
}

/// `andExpression := additionExpression ( "and" additionExpression )*`
#[derive(Debug, Clone, PartialEq)]
pub struct AndExpression {
    pub first: AdditionExpression,
    pub rest: Vec<(Token, AdditionExpression)>,
}

/// `additionExpression := multiplicationExpression ( AdditionOp multiplicationExpression )*`
///
/// The operator token of each pair carries which of `+`/`-` applies.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionExpression {
    pub first: MultiplicationExpression,
    pub rest: Vec<(Token, MultiplicationExpression)>,
}

/// `multiplicationExpression := inExpression ( MultiplicationOp inExpression )*`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplicationExpression {
    pub first: InExpression,
    pub rest: Vec<(Token, InExpression)>,
}

/// `inExpression := matchesExpression ( "in" matchesExpression )?`
///
/// Non-associative: at most one right-hand operand.
#[derive(Debug, Clone, PartialEq)]
pub struct InExpression {
    pub left: MatchesExpression,
    pub right: Option<(Token, MatchesExpression)>,
}

/// `matchesExpression := notExpression ( "matches" notExpression )?`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchesExpression {
    pub left: NotExpression,
    pub right: Option<(Token, NotExpression)>,
}

/// `notExpression := "not" notExpression | valueExpression`
#[derive(Debug, Clone, PartialEq)]
pub enum NotExpression {
    Not {
        keyword: Token,
        operand: Box<NotExpression>,
    },
    Value(ValueExpression),
}

/// `valueExpression := String | Number | Boolean | array | dotNotation | "(" expression ")"`
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpression {
    String(Token),
    Number(Token),
    /// Either a `True` or a `False` token.
    Boolean(Token),
    Array(ArrayLiteral),
    DotNotation(DotNotation),
    Group {
        open: Token,
        inner: Box<Expression>,
        close: Token,
    },
    /// Placeholder left behind by error recovery; never interpreted.
    Missing { column: usize },
}

/// `array := "[" (valueExpression ("," valueExpression)*)? "]"`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub open: Token,
    pub elements: Vec<ValueExpression>,
    pub close: Token,
}

/// `dotNotation := Identifier ( objectAccess | arrayAccess | functionCall )*`
#[derive(Debug, Clone, PartialEq)]
pub struct DotNotation {
    pub head: Token,
    pub chain: Vec<Postfix>,
}

/// One link of a postfix chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Postfix {
    /// `"." Identifier`
    ObjectAccess { period: Token, name: Token },
    /// `"[" valueExpression "]"`
    ArrayAccess {
        open: Token,
        index: Box<ValueExpression>,
        close: Token,
    },
    /// `"(" (valueExpression ("," valueExpression)*)? ")"`
    FunctionCall {
        open: Token,
        arguments: Vec<ValueExpression>,
        close: Token,
    },
}

impl ValueExpression {
    /// Column of the first token of this node.
    pub fn column(&self) -> usize {
        match self {
            ValueExpression::String(token)
            | ValueExpression::Number(token)
            | ValueExpression::Boolean(token) => token.column,
            ValueExpression::Array(array) => array.open.column,
            ValueExpression::DotNotation(dot) => dot.head.column,
            ValueExpression::Group { open, .. } => open.column,
            ValueExpression::Missing { column } => *column,
        }
    }
}
