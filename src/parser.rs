use tracing::debug;

use crate::error::{SyntaxError, UnexpectedTokenSnafu};
use crate::{Token, TokenKind, P};

/// Expression tree. Unary minus never appears here: `-x` is parsed as
/// `Sub(Number(0), x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Add(P<Expr>, P<Expr>),
    Sub(P<Expr>, P<Expr>),
    Mul(P<Expr>, P<Expr>),
    Div(P<Expr>, P<Expr>),
}

type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<'a> {
    pub tokens: Vec<Token<'a>>,
    pub index: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as produced by the tokenizer.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, index: 0 }
    }

    // parse = expr EOF
    pub fn parse(mut self) -> ParseResult<Expr> {
        let node = self.expr()?;
        self.ensure_done()?;
        debug!(ast = ?node, "parsed");
        Ok(node)
    }

    // expr = mul ("+" mul | "-" mul)*
    fn expr(&mut self) -> ParseResult<Expr> {
        let mut node = self.mul()?;

        loop {
            if self.consume('+') {
                node = Expr::Add(P::new(node), P::new(self.mul()?));
            } else if self.consume('-') {
                node = Expr::Sub(P::new(node), P::new(self.mul()?));
            } else {
                return Ok(node);
            }
        }
    }

    // mul = unary ("*" unary | "/" unary)*
    fn mul(&mut self) -> ParseResult<Expr> {
        let mut node = self.unary()?;

        loop {
            if self.consume('*') {
                node = Expr::Mul(P::new(node), P::new(self.unary()?));
            } else if self.consume('/') {
                node = Expr::Div(P::new(node), P::new(self.unary()?));
            } else {
                return Ok(node);
            }
        }
    }

    // unary = ("+" | "-")? primary
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.consume('+') {
            return self.primary();
        }
        if self.consume('-') {
            let operand = self.primary()?;
            return Ok(Expr::Sub(P::new(Expr::Number(0)), P::new(operand)));
        }
        self.primary()
    }

    // primary = "(" expr ")" | num
    fn primary(&mut self) -> ParseResult<Expr> {
        if self.consume('(') {
            let node = self.expr()?;
            self.skip(')', "')'")?;
            return Ok(node);
        }

        match self.peek().kind {
            TokenKind::Number(val) => {
                self.advance();
                Ok(Expr::Number(val))
            }
            _ => self.unexpected("a number or '('"),
        }
    }

    fn peek(&self) -> &Token<'a> {
        // The cursor never moves past `Eof`, but an empty vector must not panic.
        const EOF: Token<'static> = Token {
            kind: TokenKind::Eof,
            text: "",
            offset: 0,
        };
        self.tokens.get(self.index).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        if self.peek().kind != TokenKind::Eof {
            self.index += 1;
        }
    }

    fn consume(&mut self, op: char) -> bool {
        if self.peek().is(op) {
            self.advance();
            return true;
        }
        false
    }

    fn skip(&mut self, op: char, expected: &'static str) -> ParseResult<()> {
        if self.consume(op) {
            return Ok(());
        }
        self.unexpected(expected)
    }

    fn ensure_done(&self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Eof => Ok(()),
            _ => self.unexpected("an operator or end of input"),
        }
    }

    fn unexpected<T>(&self, expected: &'static str) -> ParseResult<T> {
        let tok = self.peek();
        UnexpectedTokenSnafu {
            expected,
            found: tok.describe(),
            offset: tok.offset,
        }
        .fail()
    }
}
