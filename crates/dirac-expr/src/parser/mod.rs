//! Parser for evaluator expressions.

mod expression;

use crate::ast::Expression;
use crate::error::{EvalError, EvalResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Deepest expression tree the parser builds.
pub const MAX_DEPTH: usize = 128;

/// Parse a source string into an expression tree.
pub fn parse_expression(source: &str) -> EvalResult<Expression> {
    let mut parser = Parser::new(source)?;
    parser.parse_input()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) source_len: usize,
    pub(super) depth: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> EvalResult<Self> {
        let token_results = tokenize(source);
        let mut tokens = Vec::new();

        for result in token_results {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, msg)) => {
                    return Err(EvalError::LexerError {
                        position: span.start,
                        message: msg,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            source_len: source.len(),
            depth: 0,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Byte offset of the current token.
    pub(super) fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source_len, |t| t.span.start)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> EvalResult<()> {
        let position = self.position();
        let found = self
            .advance()
            .ok_or_else(|| EvalError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(EvalError::UnexpectedToken {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Enter one level of recursion.
    pub(super) fn enter(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    /// Leave one level of recursion.
    pub(super) fn leave(&mut self) {
        self.depth -= 1;
    }

    pub(super) fn too_deep(&self) -> EvalError {
        EvalError::NestingTooDeep {
            position: self.position(),
            limit: MAX_DEPTH,
        }
    }

    /// Parse the whole input as a single expression.
    fn parse_input(&mut self) -> EvalResult<Expression> {
        let expr = self.parse_expression()?;
        if let Some(token) = self.peek() {
            return Err(EvalError::UnexpectedToken {
                position: self.position(),
                expected: "end of input".into(),
                found: token.to_string(),
            });
        }
        Ok(expr)
    }
}
