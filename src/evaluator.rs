use regex::{Regex, RegexBuilder};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{
    ast::{
        AdditionExpression, AdditionOp, AndExpression, DotNotation, Expression, InExpression,
        MatchesExpression, MultiplicationExpression, MultiplicationOp, NotExpression,
        OrExpression, Postfix, Token, TokenKind, ValueExpression,
    },
    context::Context,
    error::EvalError,
    value::{BoxFuture, Call, Value},
};

type Eval<'n> = BoxFuture<'n, Result<Value, EvalError>>;

/// Position in a postfix chain: the value reached so far and the context
/// that index and argument expressions are evaluated against.
struct Frame<'n> {
    current: Value,
    global: &'n Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arith {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Arith {
    fn from_token(token: &Token) -> Result<Self, EvalError> {
        match token.kind {
            TokenKind::Addition(AdditionOp::Add) => Ok(Arith::Add),
            TokenKind::Addition(AdditionOp::Subtract) => Ok(Arith::Subtract),
            TokenKind::Multiplication(MultiplicationOp::Multiply) => Ok(Arith::Multiply),
            TokenKind::Multiplication(MultiplicationOp::Divide) => Ok(Arith::Divide),
            _ => Err(EvalError::illegal_state(
                format!("'{}' is not an arithmetic operator", token.lexeme),
                token.column,
            )),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Arith::Add => "add",
            Arith::Subtract => "subtract",
            Arith::Multiply => "multiply",
            Arith::Divide => "divide",
        }
    }
}

/// Asynchronous tree-walking interpreter over the concrete syntax tree.
///
/// Holds nothing but a shared reference to the context, so one instance can
/// be used for any number of (even concurrent) interpretations.
///
/// # Examples
///
/// ```
/// use chat_expr::{Context, Interpreter, Value, parser};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let tree = parser::parse("1 + 2 * 3").unwrap();
/// let context = Context::default();
/// let result = Interpreter::new(&context).interpret(&tree).await.unwrap();
/// assert_eq!(result, Value::Integer(7));
/// # });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'a> {
    context: &'a Context,
}

impl<'a> Interpreter<'a> {
    pub fn new(context: &'a Context) -> Self {
        Interpreter { context }
    }

    pub async fn interpret(&self, tree: &Expression) -> Result<Value, EvalError> {
        self.expression(tree).await
    }

    fn expression<'n>(&'n self, node: &'n Expression) -> Eval<'n> {
        Box::pin(async move { self.or_expression(&node.or).await })
    }

    /// Every operand is evaluated, in order, even once the outcome is known.
    fn or_expression<'n>(&'n self, node: &'n OrExpression) -> Eval<'n> {
        Box::pin(async move {
            let first = self.and_expression(&node.first).await?;
            if node.rest.is_empty() {
                return Ok(first);
            }

            let mut result = first.is_truthy();
            for (_, operand) in &node.rest {
                let value = self.and_expression(operand).await?;
                result = result || value.is_truthy();
            }
            Ok(Value::Boolean(result))
        })
    }

    /// Same no-short-circuit contract as `or`.
    fn and_expression<'n>(&'n self, node: &'n AndExpression) -> Eval<'n> {
        Box::pin(async move {
            let first = self.addition_expression(&node.first).await?;
            if node.rest.is_empty() {
                return Ok(first);
            }

            let mut result = first.is_truthy();
            for (_, operand) in &node.rest {
                let value = self.addition_expression(operand).await?;
                result = result && value.is_truthy();
            }
            Ok(Value::Boolean(result))
        })
    }

    fn addition_expression<'n>(&'n self, node: &'n AdditionExpression) -> Eval<'n> {
        Box::pin(async move {
            let mut acc = self.multiplication_expression(&node.first).await?;
            for (op, operand) in &node.rest {
                let right = self.multiplication_expression(operand).await?;
                acc = apply_arithmetic(Arith::from_token(op)?, &acc, &right, op.column)?;
            }
            Ok(acc)
        })
    }

    fn multiplication_expression<'n>(&'n self, node: &'n MultiplicationExpression) -> Eval<'n> {
        Box::pin(async move {
            let mut acc = self.in_expression(&node.first).await?;
            for (op, operand) in &node.rest {
                let right = self.in_expression(operand).await?;
                acc = apply_arithmetic(Arith::from_token(op)?, &acc, &right, op.column)?;
            }
            Ok(acc)
        })
    }

    /// `needle in haystack`: substring test for strings, membership for arrays.
    fn in_expression<'n>(&'n self, node: &'n InExpression) -> Eval<'n> {
        Box::pin(async move {
            let left = self.matches_expression(&node.left).await?;
            let Some((op, right_node)) = &node.right else {
                return Ok(left);
            };
            let right = self.matches_expression(right_node).await?;

            match (&left, &right) {
                (Value::String(needle), Value::String(haystack)) => {
                    Ok(Value::Boolean(haystack.contains(needle.as_str())))
                }
                (other, Value::String(_)) => Err(EvalError::illegal_state(
                    format!(
                        "'in' needs a string on the left when the right is a string, got {}",
                        other.type_name()
                    ),
                    op.column,
                )),
                (_, Value::Array(items)) => Ok(Value::Boolean(items.contains(&left))),
                (_, other) => Err(EvalError::illegal_state(
                    format!(
                        "'in' needs a string or array on the right, got {}",
                        other.type_name()
                    ),
                    op.column,
                )),
            }
        })
    }

    fn matches_expression<'n>(&'n self, node: &'n MatchesExpression) -> Eval<'n> {
        Box::pin(async move {
            let left = self.not_expression(&node.left).await?;
            let Some((op, right_node)) = &node.right else {
                return Ok(left);
            };
            let right = self.not_expression(right_node).await?;

            match (&left, &right) {
                (Value::String(subject), Value::String(pattern)) => {
                    let regex = compile_pattern(pattern).map_err(|e| {
                        EvalError::illegal_state(format!("Invalid pattern: {}", e), op.column)
                    })?;
                    Ok(Value::Boolean(regex.is_match(subject)))
                }
                (a, b) => Err(EvalError::illegal_state(
                    format!(
                        "'matches' needs two strings, got {} and {}",
                        a.type_name(),
                        b.type_name()
                    ),
                    op.column,
                )),
            }
        })
    }

    fn not_expression<'n>(&'n self, node: &'n NotExpression) -> Eval<'n> {
        Box::pin(async move {
            match node {
                NotExpression::Not { operand, .. } => {
                    let value = self.not_expression(operand).await?;
                    Ok(Value::Boolean(!value.is_truthy()))
                }
                NotExpression::Value(value) => self.value_expression(value).await,
            }
        })
    }

    fn value_expression<'n>(&'n self, node: &'n ValueExpression) -> Eval<'n> {
        Box::pin(async move {
            match node {
                ValueExpression::String(token) => {
                    Ok(Value::String(token.string_content().to_string()))
                }
                ValueExpression::Number(token) => number_literal(token),
                ValueExpression::Boolean(token) => Ok(Value::Boolean(
                    token.kind == TokenKind::True || token.lexeme.eq_ignore_ascii_case("true"),
                )),
                ValueExpression::Array(array) => {
                    let mut items = Vec::with_capacity(array.elements.len());
                    for element in &array.elements {
                        items.push(self.value_expression(element).await?);
                    }
                    Ok(Value::Array(items))
                }
                ValueExpression::DotNotation(dot) => self.dot_notation(dot).await,
                ValueExpression::Group { inner, .. } => self.expression(inner).await,
                ValueExpression::Missing { column } => Err(EvalError::illegal_state(
                    "Incomplete expression",
                    *column,
                )),
            }
        })
    }

    fn dot_notation<'n>(&'n self, node: &'n DotNotation) -> Eval<'n> {
        Box::pin(async move {
            let head = &node.head;
            let current = self
                .context
                .get_or_default(&head.lexeme)
                .cloned()
                .ok_or_else(|| EvalError::UnknownKey {
                    key: head.lexeme.clone(),
                    column: head.column,
                })?;

            let mut frame = Frame {
                current,
                global: self.context,
            };
            for link in &node.chain {
                frame = self.step(frame, link).await?;
            }
            Ok(frame.current)
        })
    }

    /// Apply one postfix link. Index and argument expressions see the global
    /// context, never the value reached so far.
    fn step<'n>(
        &'n self,
        frame: Frame<'n>,
        link: &'n Postfix,
    ) -> BoxFuture<'n, Result<Frame<'n>, EvalError>> {
        Box::pin(async move {
            let Frame { current, global } = frame;
            let scope = Interpreter::new(global);

            let next = match link {
                Postfix::ObjectAccess { name, .. } => match current {
                    Value::Object(mut obj) => {
                        obj.remove(&name.lexeme)
                            .ok_or_else(|| EvalError::UnknownKey {
                                key: name.lexeme.clone(),
                                column: name.column,
                            })?
                    }
                    _ => {
                        return Err(EvalError::UnknownKey {
                            key: name.lexeme.clone(),
                            column: name.column,
                        });
                    }
                },
                Postfix::ArrayAccess { open, index, .. } => {
                    let index_value = scope.value_expression(index).await?;
                    let items = match current {
                        Value::Array(items) => items,
                        other => {
                            return Err(EvalError::illegal_state(
                                format!("Cannot index into {}", other.type_name()),
                                open.column,
                            ));
                        }
                    };
                    let Some(i) = index_value.as_int() else {
                        return Err(EvalError::illegal_state(
                            format!(
                                "Array index must be a whole number, got {}",
                                index_value.type_name()
                            ),
                            open.column,
                        ));
                    };
                    let length = items.len();
                    if i < 0 || i as usize >= length {
                        return Err(EvalError::OutOfBounds {
                            index: i,
                            length,
                            column: open.column,
                        });
                    }
                    items.into_iter().nth(i as usize).ok_or(EvalError::OutOfBounds {
                        index: i,
                        length,
                        column: open.column,
                    })?
                }
                Postfix::FunctionCall {
                    open, arguments, ..
                } => {
                    let function = match current {
                        Value::Function(function) => function,
                        other => {
                            return Err(EvalError::illegal_state(
                                format!("{} is not callable", other.type_name()),
                                open.column,
                            ));
                        }
                    };
                    let mut args = Vec::with_capacity(arguments.len());
                    for argument in arguments {
                        args.push(scope.value_expression(argument).await?);
                    }
                    let result = match function.call(args) {
                        Call::Ready(result) => result,
                        Call::Pending(pending) => pending.await,
                    };
                    result.map_err(|e| e.at(open.column))?
                }
            };

            Ok(Frame {
                current: next,
                global,
            })
        })
    }
}

fn number_literal(token: &Token) -> Result<Value, EvalError> {
    if let Ok(n) = token.lexeme.parse::<i64>() {
        return Ok(Value::Integer(n));
    }
    token
        .lexeme
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| {
            EvalError::illegal_state(format!("Invalid number '{}'", token.lexeme), token.column)
        })
}

/// Compile a `matches` pattern. `/body/flags` uses `body` with the flags
/// applied; anything else is taken as the whole pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(rest) = pattern.strip_prefix('/')
        && let Some(end) = rest.rfind('/')
    {
        let (body, flags) = (&rest[..end], &rest[end + 1..]);
        if flags.chars().all(|c| "gimsuyx".contains(c)) {
            return RegexBuilder::new(body)
                .case_insensitive(flags.contains('i'))
                .multi_line(flags.contains('m'))
                .dot_matches_new_line(flags.contains('s'))
                .ignore_whitespace(flags.contains('x'))
                .build();
        }
    }
    Regex::new(pattern)
}

fn apply_arithmetic(
    op: Arith,
    left: &Value,
    right: &Value,
    column: usize,
) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b, column),
        (Value::Float(a), Value::Float(b)) => float_arithmetic(op, *a, *b, column),
        (Value::Integer(a), Value::Float(b)) => {
            mixed_arithmetic(op, Decimal::from_i64(*a), Decimal::from_f64(*b), column)
                .unwrap_or_else(|| float_arithmetic(op, *a as f64, *b, column))
        }
        (Value::Float(a), Value::Integer(b)) => {
            mixed_arithmetic(op, Decimal::from_f64(*a), Decimal::from_i64(*b), column)
                .unwrap_or_else(|| float_arithmetic(op, *a, *b as f64, column))
        }
        (Value::String(_), _) | (_, Value::String(_)) if op == Arith::Add => {
            match (concat_text(left), concat_text(right)) {
                (Some(a), Some(b)) => Ok(Value::String(a + &b)),
                _ => Err(type_mismatch(op, left, right, column)),
            }
        }
        _ => Err(type_mismatch(op, left, right, column)),
    }
}

fn type_mismatch(op: Arith, left: &Value, right: &Value, column: usize) -> EvalError {
    EvalError::illegal_state(
        format!(
            "Cannot {} {} and {}",
            op.verb(),
            left.type_name(),
            right.type_name()
        ),
        column,
    )
}

fn division_by_zero(column: usize) -> EvalError {
    EvalError::illegal_state("Division by zero", column)
}

fn concat_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Checked integer math; overflow falls back to float.
fn integer_arithmetic(op: Arith, a: i64, b: i64, column: usize) -> Result<Value, EvalError> {
    let exact = match op {
        Arith::Add => a.checked_add(b),
        Arith::Subtract => a.checked_sub(b),
        Arith::Multiply => a.checked_mul(b),
        Arith::Divide => {
            if b == 0 {
                return Err(division_by_zero(column));
            }
            // Inexact quotients are floats; `i64::MIN / -1` overflows both ways.
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                Some(_) => return Ok(Value::Float(a as f64 / b as f64)),
                None => None,
            }
        }
    };
    match exact {
        Some(n) => Ok(Value::Integer(n)),
        None => float_arithmetic(op, a as f64, b as f64, column),
    }
}

fn float_arithmetic(op: Arith, a: f64, b: f64, column: usize) -> Result<Value, EvalError> {
    let result = match op {
        Arith::Add => a + b,
        Arith::Subtract => a - b,
        Arith::Multiply => a * b,
        Arith::Divide => {
            if b == 0.0 {
                return Err(division_by_zero(column));
            }
            a / b
        }
    };
    Ok(Value::Float(result))
}

/// High-precision path for mixed integer/float operands; whole results come
/// back as integers. `None` when the operands do not fit a decimal.
fn mixed_arithmetic(
    op: Arith,
    a: Option<Decimal>,
    b: Option<Decimal>,
    column: usize,
) -> Option<Result<Value, EvalError>> {
    let (a, b) = (a?, b?);
    let result = match op {
        Arith::Add => a.checked_add(b),
        Arith::Subtract => a.checked_sub(b),
        Arith::Multiply => a.checked_mul(b),
        Arith::Divide => {
            if b.is_zero() {
                return Some(Err(division_by_zero(column)));
            }
            a.checked_div(b)
        }
    }?;

    if result.is_integer()
        && let Some(n) = result.to_i64()
    {
        return Some(Ok(Value::Integer(n)));
    }
    result.to_f64().map(|f| Ok(Value::Float(f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_delimited_pattern_with_flags() {
        let re = compile_pattern("/^hello/i").unwrap();
        assert!(re.is_match("HELLO there"));
        assert!(!re.is_match("well hello"));
    }

    #[test]
    fn test_plain_pattern_is_used_verbatim() {
        let re = compile_pattern("a.c").unwrap();
        assert!(re.is_match("abc"));
        // Unknown trailing "flags" mean this is not a delimited pattern.
        let re = compile_pattern("/path/to").unwrap();
        assert!(re.is_match("/path/to"));
    }

    #[test]
    fn test_integer_division_preserves_integers_when_exact() {
        assert_eq!(
            integer_arithmetic(Arith::Divide, 6, 3, 1).unwrap(),
            Value::Integer(2)
        );
        assert_eq!(
            integer_arithmetic(Arith::Divide, 7, 2, 1).unwrap(),
            Value::Float(3.5)
        );
        assert!(integer_arithmetic(Arith::Divide, 1, 0, 1).is_err());
    }

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        let result = integer_arithmetic(Arith::Add, i64::MAX, 1, 1).unwrap();
        assert!(matches!(result, Value::Float(_)));
    }

    #[test]
    fn test_mixed_arithmetic_collapses_whole_results() {
        let result = apply_arithmetic(Arith::Add, &Value::Integer(1), &Value::Float(0.5), 1);
        assert_eq!(result.unwrap(), Value::Float(1.5));
        let result = apply_arithmetic(Arith::Multiply, &Value::Float(0.5), &Value::Integer(4), 1);
        assert_eq!(result.unwrap(), Value::Integer(2));
    }

    #[test]
    fn test_string_concatenation() {
        let result = apply_arithmetic(
            Arith::Add,
            &Value::String("level ".into()),
            &Value::Integer(3),
            1,
        );
        assert_eq!(result.unwrap(), Value::String("level 3".into()));

        let result = apply_arithmetic(
            Arith::Subtract,
            &Value::String("a".into()),
            &Value::Integer(3),
            4,
        );
        assert!(matches!(
            result,
            Err(EvalError::IllegalState { column: 4, .. })
        ));
    }
}
