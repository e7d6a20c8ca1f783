use crate::{
    ast::{
        AdditionExpression, AndExpression, ArrayLiteral, DotNotation, Expression, InExpression,
        MatchesExpression, MultiplicationExpression, NotExpression, OrExpression, Postfix, Token,
        TokenKind, ValueExpression,
    },
    error::{SyntaxError, SyntaxErrors},
    lexer::Lexer,
};

/// A syntax tree together with every error found while building it.
///
/// A tree that comes with errors contains placeholder nodes and must not be
/// interpreted; use [`ParseOutcome::into_result`] to enforce that.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub tree: Expression,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    pub fn into_result(self) -> Result<Expression, SyntaxErrors> {
        if self.errors.is_empty() {
            Ok(self.tree)
        } else {
            Err(SyntaxErrors(self.errors))
        }
    }
}

/// Tokenize and parse `source`, failing if either phase reported an error.
pub fn parse(source: &str) -> Result<Expression, SyntaxErrors> {
    let lexed = Lexer::new(source).tokenize();
    let mut outcome = Parser::new(lexed.tokens).parse();

    if !lexed.errors.is_empty() {
        let mut errors = lexed.errors;
        errors.append(&mut outcome.errors);
        errors.sort_by_key(|e| e.column);
        return Err(SyntaxErrors(errors));
    }
    outcome.into_result()
}

/// Single-use recursive-descent parser; `parse` consumes it.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    /// Column just past the previous token, or of the next one if any.
    fn current_column(&self) -> usize {
        match self.peek() {
            Some(token) => token.column,
            None => self
                .tokens
                .last()
                .map(|t| t.column + t.width())
                .unwrap_or(1),
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn advance_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) { self.advance() } else { None }
    }

    fn describe_next(&self) -> String {
        match self.peek() {
            Some(token) => format!("'{}'", token.lexeme),
            None => "end of input".to_string(),
        }
    }

    fn error(&mut self, message: String, column: usize) {
        self.errors.push(SyntaxError::new(message, column));
    }

    /// Consume a token of `kind`, or record an error and synthesize a
    /// zero-width one so parsing can continue.
    fn expect(&mut self, kind: TokenKind) -> Token {
        if let Some(token) = self.advance_if(kind) {
            return token;
        }
        let column = self.current_column();
        let message = format!("Expected {}, got {}", kind, self.describe_next());
        self.error(message, column);
        Token::missing(kind, column)
    }

    pub fn parse(mut self) -> ParseOutcome {
        let tree = self.parse_expression();

        if let Some(token) = self.peek() {
            let message = format!("Unexpected token '{}' after expression", token.lexeme);
            let column = token.column;
            self.error(message, column);
        }

        ParseOutcome {
            tree,
            errors: self.errors,
        }
    }

    fn parse_expression(&mut self) -> Expression {
        Expression {
            or: self.parse_or(),
        }
    }

    fn parse_or(&mut self) -> OrExpression {
        let first = self.parse_and();
        let mut rest = Vec::new();

        while let Some(op) = self.advance_if(TokenKind::Or) {
            rest.push((op, self.parse_and()));
        }
        OrExpression { first, rest }
    }

    fn parse_and(&mut self) -> AndExpression {
        let first = self.parse_addition();
        let mut rest = Vec::new();

        while let Some(op) = self.advance_if(TokenKind::And) {
            rest.push((op, self.parse_addition()));
        }
        AndExpression { first, rest }
    }

    fn parse_addition(&mut self) -> AdditionExpression {
        let first = self.parse_multiplication();
        let mut rest = Vec::new();

        while matches!(self.peek(), Some(Token { kind: TokenKind::Addition(_), .. })) {
            if let Some(op) = self.advance() {
                rest.push((op, self.parse_multiplication()));
            }
        }
        AdditionExpression { first, rest }
    }

    fn parse_multiplication(&mut self) -> MultiplicationExpression {
        let first = self.parse_in();
        let mut rest = Vec::new();

        while matches!(
            self.peek(),
            Some(Token {
                kind: TokenKind::Multiplication(_),
                ..
            })
        ) {
            if let Some(op) = self.advance() {
                rest.push((op, self.parse_in()));
            }
        }
        MultiplicationExpression { first, rest }
    }

    fn parse_in(&mut self) -> InExpression {
        let left = self.parse_matches();
        let right = self
            .advance_if(TokenKind::In)
            .map(|op| (op, self.parse_matches()));
        InExpression { left, right }
    }

    fn parse_matches(&mut self) -> MatchesExpression {
        let left = self.parse_not();
        let right = self
            .advance_if(TokenKind::Matches)
            .map(|op| (op, self.parse_not()));
        MatchesExpression { left, right }
    }

    fn parse_not(&mut self) -> NotExpression {
        match self.advance_if(TokenKind::Not) {
            Some(keyword) => NotExpression::Not {
                keyword,
                operand: Box::new(self.parse_not()),
            },
            None => NotExpression::Value(self.parse_value()),
        }
    }

    fn parse_value(&mut self) -> ValueExpression {
        let Some(kind) = self.peek().map(|t| t.kind) else {
            let column = self.current_column();
            self.error("Expected a value, got end of input".to_string(), column);
            return ValueExpression::Missing { column };
        };

        match kind {
            TokenKind::String => self.literal(ValueExpression::String),
            TokenKind::Number => self.literal(ValueExpression::Number),
            TokenKind::True | TokenKind::False => self.literal(ValueExpression::Boolean),
            TokenKind::LBracket => ValueExpression::Array(self.parse_array()),
            TokenKind::Identifier => ValueExpression::DotNotation(self.parse_dot_notation()),
            TokenKind::LParen => {
                let open = self.expect(TokenKind::LParen);
                let inner = Box::new(self.parse_expression());
                let close = self.expect(TokenKind::RParen);
                ValueExpression::Group { open, inner, close }
            }
            _ => {
                let column = self.current_column();
                let message = format!("Expected a value, got {}", self.describe_next());
                self.error(message, column);
                // Closers are left in place so the enclosing rule can match them.
                if !matches!(
                    kind,
                    TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma
                ) {
                    self.advance();
                }
                ValueExpression::Missing { column }
            }
        }
    }

    fn literal(&mut self, build: fn(Token) -> ValueExpression) -> ValueExpression {
        match self.advance() {
            Some(token) => build(token),
            None => ValueExpression::Missing {
                column: self.current_column(),
            },
        }
    }

    /// Comma-separated values up to (not including) `close`.
    fn parse_value_list(&mut self, close: TokenKind) -> Vec<ValueExpression> {
        let mut values = Vec::new();
        if self.check(close) {
            return values;
        }

        values.push(self.parse_value());
        while self.advance_if(TokenKind::Comma).is_some() {
            values.push(self.parse_value());
        }
        values
    }

    fn parse_array(&mut self) -> ArrayLiteral {
        let open = self.expect(TokenKind::LBracket);
        let elements = self.parse_value_list(TokenKind::RBracket);
        let close = self.expect(TokenKind::RBracket);
        ArrayLiteral {
            open,
            elements,
            close,
        }
    }

    fn parse_dot_notation(&mut self) -> DotNotation {
        let head = self.expect(TokenKind::Identifier);
        let mut chain = Vec::new();

        loop {
            if let Some(period) = self.advance_if(TokenKind::Period) {
                let name = self.expect(TokenKind::Identifier);
                chain.push(Postfix::ObjectAccess { period, name });
            } else if let Some(open) = self.advance_if(TokenKind::LBracket) {
                let index = Box::new(self.parse_value());
                let close = self.expect(TokenKind::RBracket);
                chain.push(Postfix::ArrayAccess { open, index, close });
            } else if let Some(open) = self.advance_if(TokenKind::LParen) {
                let arguments = self.parse_value_list(TokenKind::RParen);
                let close = self.expect(TokenKind::RParen);
                chain.push(Postfix::FunctionCall {
                    open,
                    arguments,
                    close,
                });
            } else {
                break;
            }
        }
        DotNotation { head, chain }
    }
}
