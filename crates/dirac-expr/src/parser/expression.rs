//! Expression parsing.

use super::{MAX_DEPTH, Parser};
use crate::ast::{BinOp, Constant, Expression, Function};
use crate::error::{EvalError, EvalResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> EvalResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    ///
    /// Juxtaposition (`2 i`, `(a)(b)`) is multiplication at the same level
    /// as `*`.
    fn parse_binary_expr(&mut self, min_prec: u8) -> EvalResult<Expression> {
        let mut left = self.parse_unary_expr()?;
        let mut height = left.depth();

        loop {
            let (op, implicit) = match self.peek_binary_op() {
                Some(op) => (op, false),
                None if self.starts_operand() => (BinOp::Mul, true),
                None => break,
            };
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            if !implicit {
                self.advance(); // consume operator
            }

            let right = self.parse_binary_expr(prec + 1)?;
            height = height.max(right.depth()) + 1;
            if height > MAX_DEPTH {
                return Err(self.too_deep());
            }
            left = Expression::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression.
    ///
    /// Every recursive path of the grammar passes through here, so this is
    /// where nesting depth is tracked.
    fn parse_unary_expr(&mut self) -> EvalResult<Expression> {
        self.enter()?;
        let result = self.parse_unary_inner();
        self.leave();
        result
    }

    fn parse_unary_inner(&mut self) -> EvalResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_power_expr()
    }

    /// Parse exponentiation (right-associative, tighter than unary minus).
    fn parse_power_expr(&mut self) -> EvalResult<Expression> {
        let base = self.parse_primary_expr()?;
        if self.consume(&Token::Caret) {
            let exponent = self.parse_unary_expr()?;
            return Ok(Expression::BinOp {
                left: Box::new(base),
                op: BinOp::Pow,
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> EvalResult<Expression> {
        let position = self.position();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| EvalError::UnexpectedEof("expression".into()))?;

        match token {
            Token::Number(v) => {
                self.advance();
                Ok(Expression::Number(v))
            }
            Token::Identifier(name) => {
                self.advance();
                if let Some(constant) = Constant::from_name(&name) {
                    return Ok(Expression::Constant(constant));
                }
                if !self.check(&Token::LParen) {
                    return Err(EvalError::UnknownIdentifier(name));
                }
                let function =
                    Function::from_name(&name).ok_or(EvalError::UnknownFunction(name))?;
                self.expect(Token::LParen)?;
                let args = self.parse_expression_list()?;
                self.expect(Token::RParen)?;
                Ok(Expression::FnCall { function, args })
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Paren(Box::new(expr)))
            }
            Token::LBracket => {
                self.advance();
                self.parse_matrix_literal()
            }
            _ => Err(EvalError::UnexpectedToken {
                position,
                expected: "expression".into(),
                found: token.to_string(),
            }),
        }
    }

    /// Parse the body of a matrix literal after the opening bracket.
    fn parse_matrix_literal(&mut self) -> EvalResult<Expression> {
        if self.check(&Token::RBracket) {
            return Err(EvalError::RaggedMatrix("empty matrix literal".into()));
        }
        let mut rows = Vec::new();
        loop {
            let mut row = vec![self.parse_expression()?];
            while self.consume(&Token::Comma) {
                row.push(self.parse_expression()?);
            }
            rows.push(row);
            if !self.consume(&Token::Semicolon) {
                break;
            }
        }
        self.expect(Token::RBracket)?;
        Ok(Expression::Matrix(rows))
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Whether the current token can begin an implicit product operand.
    fn starts_operand(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Number(_) | Token::Identifier(_) | Token::LParen | Token::LBracket)
        )
    }

    /// Parse expression list.
    pub(super) fn parse_expression_list(&mut self) -> EvalResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

/// Get operator precedence.
fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}
