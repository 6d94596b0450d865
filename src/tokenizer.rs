use snafu::ResultExt;
use tracing::{debug, trace};

use crate::error::{InvalidCharSnafu, LexError, NumberOverflowSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `+ - * / ( )`.
    Operator(char),
    Number(i64),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is(&self, op: char) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    /// How the token reads in a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tokenizer<'a> {
    pub source: &'a str,
    pub index: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }

    /// Scan the whole source. The returned vector always ends with exactly
    /// one `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = vec![];
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => tokens.push(self.number()?),
                b'+' | b'-' | b'*' | b'/' | b'(' | b')' => tokens.push(self.punct(c)),
                // C isspace, which also accepts vertical tab
                c if c.is_ascii_whitespace() || c == b'\x0b' => self.advance(),
                _ => {
                    let ch = self.source[self.index..].chars().next().unwrap_or('\0');
                    return InvalidCharSnafu {
                        ch,
                        offset: self.index,
                    }
                    .fail();
                }
            }
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            text: "",
            offset: self.index,
        });

        for tok in &tokens {
            trace!(kind = ?tok.kind, offset = tok.offset, "token");
        }
        debug!(count = tokens.len(), "tokenized");
        Ok(tokens)
    }

    fn punct(&mut self, c: u8) -> Token<'a> {
        let start = self.index;
        self.advance();
        Token {
            kind: TokenKind::Operator(c as char),
            text: &self.source[start..self.index],
            offset: start,
        }
    }

    fn number(&mut self) -> Result<Token<'a>, LexError> {
        let start = self.index;
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        let text = &self.source[start..self.index];
        let num = text.parse::<i64>().context(NumberOverflowSnafu {
            text,
            offset: start,
        })?;

        Ok(Token {
            kind: TokenKind::Number(num),
            text,
            offset: start,
        })
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.index).copied()
    }
}
