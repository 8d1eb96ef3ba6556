pub mod error;
pub mod image;
pub mod parser;
pub mod symtab;
pub mod token;

use error::Diag;

/// Assemble one source text into image words: the origin word followed by
/// the encoded program, ready for big-endian serialization.
pub fn assemble(source: &str) -> Result<Vec<u16>, Diag> {
    let lines = token::Line::split(source);
    let stmts = parser::parse(&lines)?;
    let layout = symtab::locate(stmts)?;
    image::emit(&layout.symtab, &layout.stmts)
}
