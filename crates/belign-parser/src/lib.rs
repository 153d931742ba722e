//! belign-parser — Lexer, recursive-descent parser, and normaliser for the
//! BEL statement grammar.
//!
//! The grammar is made explicit rather than regex-split so malformed input
//! and nesting (complex/act/tloc wrapping) are handled exhaustively.

pub mod lexer;
pub mod normalise;
pub mod parser;

pub use normalise::Normaliser;
pub use parser::{parse_statement, ParsedStatement};

use belign_common::config::ModificationMap;
use belign_common::ParseError;

/// Parse and normalise in one step — the form the comparison pipeline uses.
pub fn parse_and_normalise(
    input: &str,
    mods: &ModificationMap,
) -> Result<ParsedStatement, ParseError> {
    let parsed = parse_statement(input)?;
    Ok(Normaliser::new(mods).normalise_statement(&parsed))
}
