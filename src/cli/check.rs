//! Syntax checking and token listing

use crate::{lexer, parser};

use super::CliError;

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
}

/// Validate the syntax of an expression without evaluating it
pub fn execute_check(expression: &str) -> Result<CheckResult, CliError> {
    parser::parse(expression)?;
    Ok(CheckResult::SyntaxValid)
}

/// One `column kind lexeme` line per token; lexer errors fail the listing
pub fn list_tokens(expression: &str) -> Result<Vec<String>, CliError> {
    let lexed = lexer::tokenize(expression);
    if !lexed.errors.is_empty() {
        return Err(CliError::Syntax(crate::SyntaxErrors(lexed.errors)));
    }

    Ok(lexed
        .tokens
        .iter()
        .map(|t| format!("{:>4} {:<12} {}", t.column, t.kind.to_string(), t.lexeme))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid_and_invalid() {
        assert_eq!(
            execute_check("a in b").unwrap(),
            CheckResult::SyntaxValid
        );
        let Err(CliError::Syntax(errors)) = execute_check("a in b in c") else {
            panic!("expected syntax errors");
        };
        assert_eq!(errors.0[0].column, 8);
    }

    #[test]
    fn test_list_tokens() {
        let lines = list_tokens("not x").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("'not'"));
        assert!(lines[1].trim_start().starts_with('5'));
    }
}
