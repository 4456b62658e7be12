//! Error types for lexing and parsing annotation values

use thiserror::Error;

/// A character that is not part of the shorthand grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character `{found}` at byte {position} of `{input}`")]
pub struct LexError {
    pub position: usize,
    pub found: char,
    pub input: String,
}

/// Errors that can occur while parsing an annotation value
///
/// Positions and inputs refer to the normalized invocation text, i.e. after a bare
/// `name(args)` form has been wrapped into a full tag invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at byte {position} of `{input}`")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
        input: String,
    },

    #[error("expected {expected}, found end of input in `{input}`")]
    UnexpectedEnd {
        expected: &'static str,
        input: String,
    },

    #[error("argument lists nested deeper than {limit} levels in `{input}`")]
    NestingTooDeep { limit: usize, input: String },
}

impl ParseError {
    /// The annotation text the error refers to
    pub fn input(&self) -> &str {
        match self {
            ParseError::Lex(error) => &error.input,
            ParseError::UnexpectedToken { input, .. }
            | ParseError::UnexpectedEnd { input, .. }
            | ParseError::NestingTooDeep { input, .. } => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_the_input() {
        let error = ParseError::UnexpectedEnd {
            expected: "a value",
            input: "{flux:foo(bar=}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "expected a value, found end of input in `{flux:foo(bar=}`"
        );
        assert_eq!(error.input(), "{flux:foo(bar=}");
    }

    #[test]
    fn test_lex_error_is_transparent() {
        let error = ParseError::from(LexError {
            position: 3,
            found: ';',
            input: "a=1;".to_string(),
        });
        assert_eq!(error.to_string(), "unexpected character `;` at byte 3 of `a=1;`");
        assert_eq!(error.input(), "a=1;");
    }
}
