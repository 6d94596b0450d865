type P<T> = Box<T>;

pub mod codegen;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use codegen::*;
pub use error::*;
pub use parser::*;
pub use tokenizer::*;

/// Run the whole pipeline: source text in, assembly text out. Nothing is
/// produced unless every stage succeeds.
pub fn compile(src: &str, syntax: Syntax) -> CompileResult<String> {
    let tokens = Tokenizer::new(src).tokenize()?;
    let node = Parser::new(tokens).parse()?;
    Ok(Codegen::new(syntax).program(&node))
}
