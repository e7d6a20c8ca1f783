use crate::{
    ast::{AdditionOp, MultiplicationOp, Token, TokenKind},
    error::SyntaxError,
};

/// Result of tokenizing a source string.
///
/// Tokenizing never aborts: unrecognized characters are reported in `errors`
/// and skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    pub errors: Vec<SyntaxError>,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Tokens {
    Lexer::new(source).tokenize()
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn column(&self) -> usize {
        self.position + 1
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.slice(start)
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.slice(start)
    }

    /// A string only matches when its closing quote exists; otherwise the
    /// opening quote is left for the caller to report.
    fn read_string(&mut self) -> Option<String> {
        let start = self.position;
        let close = self.input[start + 1..].iter().position(|&c| c == '"')?;
        self.position = start + 1 + close + 1;
        Some(self.slice(start))
    }

    fn single(&mut self, kind: TokenKind, ch: char) -> Token {
        let column = self.column();
        self.advance();
        Token::new(kind, ch.to_string(), column)
    }

    /// Produce the next token, an error for an unrecognized character, or
    /// `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token, SyntaxError>> {
        self.skip_whitespace();

        let column = self.column();
        let ch = self.current_char()?;
        let token = match ch {
            '(' => self.single(TokenKind::LParen, ch),
            ')' => self.single(TokenKind::RParen, ch),
            '[' => self.single(TokenKind::LBracket, ch),
            ']' => self.single(TokenKind::RBracket, ch),
            ',' => self.single(TokenKind::Comma, ch),
            '.' => self.single(TokenKind::Period, ch),
            '+' => self.single(TokenKind::Addition(AdditionOp::Add), ch),
            '-' => self.single(TokenKind::Addition(AdditionOp::Subtract), ch),
            '*' => self.single(TokenKind::Multiplication(MultiplicationOp::Multiply), ch),
            '/' => self.single(TokenKind::Multiplication(MultiplicationOp::Divide), ch),
            '"' => match self.read_string() {
                Some(lexeme) => Token::new(TokenKind::String, lexeme, column),
                None => {
                    self.advance();
                    return Some(Err(SyntaxError::new(
                        "Unterminated string literal",
                        column,
                    )));
                }
            },
            c if c.is_ascii_digit() => Token::new(TokenKind::Number, self.read_number(), column),
            c if c.is_ascii_alphabetic() || c == '_' => {
                // The whole word is read first, so keywords only win when
                // they end on a word boundary: `index` stays one identifier.
                let word = self.read_word();
                let kind = match word.to_ascii_lowercase().as_str() {
                    "in" => TokenKind::In,
                    "not" => TokenKind::Not,
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "matches" => TokenKind::Matches,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Identifier,
                };
                Token::new(kind, word, column)
            }
            c => {
                self.advance();
                return Some(Err(SyntaxError::new(
                    format!("Unexpected character '{}'", c),
                    column,
                )));
            }
        };
        Some(Ok(token))
    }

    pub fn tokenize(mut self) -> Tokens {
        let mut out = Tokens::default();
        while let Some(next) = self.next_token() {
            match next {
                Ok(token) => out.tokens.push(token),
                Err(error) => out.errors.push(error),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("IN Not AND or MATCHES True fAlSe"),
            vec![
                TokenKind::In,
                TokenKind::Not,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Matches,
                TokenKind::True,
                TokenKind::False,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_stays_identifier() {
        assert_eq!(kinds("index"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("notice"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("order"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("android"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("truely"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_columns_are_one_based() {
        let out = tokenize("  a + \"b c\"");
        let columns: Vec<usize> = out.tokens.iter().map(|t| t.column).collect();
        assert_eq!(columns, vec![3, 5, 7]);
        assert_eq!(out.tokens[2].lexeme, "\"b c\"");
        assert_eq!(out.tokens[2].string_content(), "b c");
    }

    #[test]
    fn test_unknown_character_is_reported_and_skipped() {
        let out = tokenize("a $ b");
        assert_eq!(out.tokens.len(), 2);
        assert_eq!(out.errors, vec![SyntaxError::new("Unexpected character '$'", 3)]);
    }

    #[test]
    fn test_unterminated_string() {
        let out = tokenize("\"abc");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].column, 1);
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_no_negative_or_decimal_literals() {
        assert_eq!(
            kinds("-5"),
            vec![TokenKind::Addition(AdditionOp::Subtract), TokenKind::Number]
        );
        assert_eq!(
            kinds("1.5"),
            vec![TokenKind::Number, TokenKind::Period, TokenKind::Number]
        );
    }
}
