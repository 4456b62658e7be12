//! Lexer for annotation values
//!
//! Tokenization is handled entirely by logos (see [tokens]). Two entry points exist because the
//! two callers want different failure behavior:
//!
//! - [tokenize_with_locations] is strict: a character outside the grammar is a [LexError]. The
//!   expression parser uses it, since a malformed annotation must be reported, not guessed at.
//! - [tokenize_lossy] drops anything logos cannot match. Standalone argument scanning uses it,
//!   so stray characters between arguments are simply skipped.

pub mod tokens;

pub use tokens::Token;

use crate::ast::LexError;
use logos::Logos;
use std::ops::Range;

/// A token paired with its byte range in the source
pub type SpannedToken = (Token, Range<usize>);

/// Tokenize an annotation value, failing on the first character outside the grammar
pub fn tokenize_with_locations(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let position = lexer.span().start;
                return Err(LexError {
                    position,
                    found: source[position..].chars().next().unwrap_or_default(),
                    input: source.to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

/// Tokenize an annotation value, silently dropping unrecognized input
pub fn tokenize_lossy(source: &str) -> Vec<SpannedToken> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => log::trace!("dropping unrecognized input at {:?}", lexer.span()),
        }
    }

    tokens
}
