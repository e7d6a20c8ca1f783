use std::fmt;

use crate::ast::{AdditionOp, MultiplicationOp};

/// The category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// String literal enclosed in double quotes, taken verbatim (no escapes)
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "/^!cmd/i"
    /// ```
    String,

    /// Run of ASCII digits
    ///
    /// There are no negative or decimal literals.
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Number,

    /// `true`, matched case-insensitively
    True,

    /// `false`, matched case-insensitively
    False,

    // Identifiers
    /// Name resolved against the evaluation context
    ///
    /// Starts with an ASCII letter or underscore, followed by ASCII letters,
    /// digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// sender
    /// getFollowAge
    /// index
    /// ```
    Identifier,

    // Keywords (case-insensitive, whole words only)
    /// Containment test
    ///
    /// # Examples
    /// ```text
    /// "mod" in sender.badges
    /// ```
    In,

    /// Logical negation
    Not,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Regular expression match
    ///
    /// # Examples
    /// ```text
    /// message.text matches "/^!hello/i"
    /// ```
    Matches,

    // Operators
    /// `+` or `-`
    Addition(AdditionOp),

    /// `*` or `/`
    Multiplication(MultiplicationOp),

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket for array literals and index access
    LBracket,

    /// Right bracket
    RBracket,

    /// Comma separating arguments or array elements
    Comma,

    /// Period for property access
    Period,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::String => write!(f, "string"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::Not => write!(f, "'not'"),
            TokenKind::And => write!(f, "'and'"),
            TokenKind::Or => write!(f, "'or'"),
            TokenKind::Matches => write!(f, "'matches'"),
            TokenKind::Addition(op) => write!(f, "'{}'", op.symbol()),
            TokenKind::Multiplication(op) => write!(f, "'{}'", op.symbol()),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Period => write!(f, "'.'"),
        }
    }
}

/// A token together with the source text it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim source slice; string lexemes keep their quotes.
    pub lexeme: String,
    /// 1-based column of the first character, counted in chars.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, column: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            column,
        }
    }

    /// Zero-width stand-in for a token the parser expected but did not find.
    pub fn missing(kind: TokenKind, column: usize) -> Self {
        Token {
            kind,
            lexeme: String::new(),
            column,
        }
    }

    /// Content of a string literal without its surrounding quotes.
    pub fn string_content(&self) -> &str {
        self.lexeme
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(&self.lexeme)
    }

    /// Number of chars this token spans in the source.
    pub fn width(&self) -> usize {
        self.lexeme.chars().count()
    }
}
