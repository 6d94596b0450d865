use std::num::ParseIntError;

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LexError {
    #[snafu(display("invalid character {ch:?}"))]
    InvalidChar { ch: char, offset: usize },

    #[snafu(display("number {text} does not fit in a 64-bit integer"))]
    NumberOverflow {
        text: String,
        offset: usize,
        source: ParseIntError,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyntaxError {
    #[snafu(display("expected {expected}, but got {found}"))]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },
}

/// Anything that stops the pipeline. Both kinds are fatal; there is no
/// partial output.
#[derive(Debug, Snafu)]
pub enum CompileError {
    #[snafu(context(false), display("{source}"))]
    Lex { source: LexError },

    #[snafu(context(false), display("{source}"))]
    Syntax { source: SyntaxError },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::InvalidChar { offset, .. } | LexError::NumberOverflow { offset, .. } => {
                *offset
            }
        }
    }
}

impl SyntaxError {
    pub fn offset(&self) -> usize {
        match self {
            SyntaxError::UnexpectedToken { offset, .. } => *offset,
        }
    }
}

impl CompileError {
    /// Byte offset into the source where the problem was found.
    pub fn offset(&self) -> usize {
        match self {
            CompileError::Lex { source } => source.offset(),
            CompileError::Syntax { source } => source.offset(),
        }
    }

    /// Render the source line with a caret under the offending character.
    ///
    /// ```text
    /// 1+a
    ///   ^ invalid character 'a'
    /// ```
    pub fn report(&self, src: &str) -> String {
        let offset = self.offset();
        let column = src
            .get(..offset)
            .map_or(offset, |prefix| prefix.chars().count());
        format!("{src}\n{: <column$}^ {self}", "")
    }
}
