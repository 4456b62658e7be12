//! Token definitions for the annotation shorthand
//!
//! Tokens are produced by the logos derive macro. Whitespace between tokens carries no meaning in
//! the shorthand and is skipped by the lexer itself, so the parser never sees it.
//!
//! Grammar of the token layer:
//!
//!     OpenBrace "{"   CloseBrace "}"   OpenParen "("   CloseParen ")"
//!     Comma ","       Colon ":"        Equals "="
//!     Number    [0-9.]+
//!     Word      [A-Za-z_][A-Za-z0-9_.\-]*
//!     Quoted    '...' or "..." (a backslash escapes the enclosing quote)
//!
//! Quoted text deliberately reads cleaner than the template engine's own array syntax, which only
//! strips single quotes and leaves `\'` escaped: here both quote styles are stripped and an
//! escaped enclosing quote becomes the bare quote. Any other backslash is kept as written.

use logos::Logos;
use std::fmt;

/// All possible tokens in an annotation value
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,

    // Kept as the raw lexeme; coercion into integer or float happens after parsing.
    #[regex(r"[0-9.]+", |lex| lex.slice().to_string())]
    Number(String),

    // Keys, tag identifiers, namespaces and bare (variable-like) values.
    #[regex(r"[A-Za-z_][A-Za-z0-9_.\-]*", |lex| lex.slice().to_string())]
    Word(String),

    // Content without the surrounding quotes.
    #[regex(r"'([^'\\]|\\.)*'", |lex| unquote(lex.slice()))]
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    Quoted(String),
}

impl Token {
    /// Check if this token can open an argument (`key=` or `key:`)
    pub fn is_key(&self) -> bool {
        match self {
            Token::Word(_) => true,
            Token::Number(digits) => is_all_digits(digits),
            _ => false,
        }
    }

    /// Check if this token separates a key from its value
    pub fn is_key_delimiter(&self) -> bool {
        matches!(self, Token::Equals | Token::Colon)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenBrace => write!(f, "`{{`"),
            Token::CloseBrace => write!(f, "`}}`"),
            Token::OpenParen => write!(f, "`(`"),
            Token::CloseParen => write!(f, "`)`"),
            Token::Comma => write!(f, "`,`"),
            Token::Colon => write!(f, "`:`"),
            Token::Equals => write!(f, "`=`"),
            Token::Number(lexeme) => write!(f, "number `{}`", lexeme),
            Token::Word(word) => write!(f, "`{}`", word),
            Token::Quoted(text) => write!(f, "string '{}'", text),
        }
    }
}

/// True for a non-empty run of ASCII digits
pub(crate) fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Strip the enclosing quotes and unescape the quote character itself.
fn unquote(slice: &str) -> String {
    let quote = &slice[..1];
    let inner = &slice[1..slice.len() - 1];
    inner.replace(&format!("\\{}", quote), quote)
}
