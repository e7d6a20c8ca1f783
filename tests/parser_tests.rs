// tests/parser_tests.rs

use chat_expr::ast::{NotExpression, Postfix, ValueExpression};
use chat_expr::lexer::tokenize;
use chat_expr::parser::{Parser, parse};

fn error_columns(source: &str) -> Vec<usize> {
    match parse(source) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.column).collect(),
    }
}

/// Drill down to the single value of an expression with no operators.
fn sole_value(source: &str) -> ValueExpression {
    let tree = parse(source).expect("expression should parse");
    let or = tree.or;
    assert!(or.rest.is_empty());
    let and = or.first;
    assert!(and.rest.is_empty());
    let addition = and.first;
    assert!(addition.rest.is_empty());
    let multiplication = addition.first;
    assert!(multiplication.rest.is_empty());
    let in_expr = multiplication.first;
    assert!(in_expr.right.is_none());
    let matches_expr = in_expr.left;
    assert!(matches_expr.right.is_none());
    match matches_expr.left {
        NotExpression::Value(value) => value,
        other => panic!("expected a value, got {:?}", other),
    }
}

// ============================================================================
// Well-formed Input
// ============================================================================

#[test]
fn test_well_formed_expressions() {
    let sources = [
        "1",
        "\"text\"",
        "true",
        "[]",
        "[1, \"two\", [three]]",
        "user.name",
        "pick([\"a\", \"b\"])",
        "test[1][2]().hello",
        "a in b",
        "a matches b",
        "not not a",
        "a and b or c and d",
        "1 + 2 * 3 - 4 / 5",
        "(a or b) and c",
        "fetchJson(\"http://x\").items[0].name",
        "f()",
        "NOT a AND b",
    ];
    for source in sources {
        assert!(
            parse(source).is_ok(),
            "expected {} to parse: {:?}",
            source,
            parse(source).err()
        );
    }
}

#[test]
fn test_postfix_chain_shape() {
    let ValueExpression::DotNotation(dot) = sole_value("test[1][2]().hello") else {
        panic!("expected dot notation");
    };
    assert_eq!(dot.head.lexeme, "test");
    assert_eq!(dot.chain.len(), 4);
    assert!(matches!(dot.chain[0], Postfix::ArrayAccess { .. }));
    assert!(matches!(dot.chain[1], Postfix::ArrayAccess { .. }));
    assert!(matches!(
        &dot.chain[2],
        Postfix::FunctionCall { arguments, .. } if arguments.is_empty()
    ));
    assert!(matches!(
        &dot.chain[3],
        Postfix::ObjectAccess { name, .. } if name.lexeme == "hello"
    ));
}

#[test]
fn test_array_elements_are_values() {
    let ValueExpression::Array(array) = sole_value("[1, [2, 3], x.y]") else {
        panic!("expected array literal");
    };
    assert_eq!(array.elements.len(), 3);
    assert!(matches!(array.elements[1], ValueExpression::Array(_)));
    assert!(matches!(array.elements[2], ValueExpression::DotNotation(_)));
}

#[test]
fn test_precedence_nesting() {
    // `or` binds loosest, so one top-level `or` with two operands.
    let tree = parse("a and b or c").expect("should parse");
    assert_eq!(tree.or.rest.len(), 1);
    assert_eq!(tree.or.first.rest.len(), 1);

    // `*` nests below `+`.
    let tree = parse("1 + 2 * 3").expect("should parse");
    let addition = &tree.or.first.first;
    assert_eq!(addition.rest.len(), 1);
    assert_eq!(addition.rest[0].1.rest.len(), 1);
}

#[test]
fn test_not_nests() {
    let tree = parse("not not x").expect("should parse");
    let outer = &tree.or.first.first.first.first.left.left;
    let NotExpression::Not { operand, .. } = outer else {
        panic!("expected not");
    };
    assert!(matches!(**operand, NotExpression::Not { .. }));
}

// ============================================================================
// Errors and Recovery
// ============================================================================

#[test]
fn test_in_and_matches_do_not_chain() {
    assert_eq!(error_columns("a in b in c"), vec![8]);
    assert_eq!(error_columns("a matches b matches c"), vec![13]);
}

#[test]
fn test_argument_must_be_value_not_expression() {
    // Arguments and array elements are plain values.
    assert!(parse("f(1 + 2)").is_err());
    assert!(parse("[not a]").is_err());
}

#[test]
fn test_missing_close_bracket() {
    let errors = parse("[1, 2").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.0[0].column, 6);
    assert!(errors.0[0].message.contains("']'"));
}

#[test]
fn test_missing_operand() {
    let errors = parse("a and").unwrap_err();
    assert_eq!(errors.0[0].column, 6);
    assert!(errors.0[0].message.contains("end of input"));
}

#[test]
fn test_recovery_reports_several_errors() {
    // The stray `)` inside the list and the unclosed call are both reported.
    let outcome = Parser::new(tokenize("f(,) + [1").tokens).parse();
    assert!(outcome.errors.len() >= 2, "errors: {:?}", outcome.errors);
    assert!(outcome.into_result().is_err());
}

#[test]
fn test_lexer_errors_are_merged_in_column_order() {
    let errors = parse("a and $ or \"open").unwrap_err();
    let columns: Vec<_> = errors.iter().map(|e| e.column).collect();
    let mut sorted = columns.clone();
    sorted.sort();
    assert_eq!(columns, sorted);
    assert!(errors.iter().any(|e| e.message.contains("'$'")));
    assert!(errors.iter().any(|e| e.message.contains("Unterminated")));
}

#[test]
fn test_empty_input_is_an_error() {
    assert_eq!(error_columns(""), vec![1]);
}

#[test]
fn test_display_lists_every_error() {
    let errors = parse("a in b in c").unwrap_err();
    assert_eq!(
        errors.to_string(),
        "Syntax error at column 8: Unexpected token 'in' after expression"
    );
}
