//! Argument list parsing
//!
//! Grammar: `<arguments> = <argument> ("," <argument>)* ","?`
//! Where:   `<argument>  = <key> ("=" | ":") <value>`, followed by `,`, `}` or the end
//!          `<value>     = <quoted> | <number> | <word> | "{" <arguments> "}"`
//!
//! Parsing happens in two steps. The recursive descent [ArgumentParser] turns tokens into
//! [RawArgument]s that still hold lexemes, then [coerce] turns those into typed [Value]s. Keeping
//! the steps apart means the grammar decides what is well-formed and coercion alone decides what
//! is kept: bare words and empty sub-lists parse fine but produce no entry.
//!
//! Argument lists are always scanned leniently: a token that does not start a complete argument
//! is skipped and scanning resumes at the next one, so `min=-1` or `required` simply produce no
//! entry. A `{...}` sub-list counts as one value and must be well-formed as a whole. Nesting
//! deeper than the configured limit is the only error scanning reports.
//!
//! Only the call shape around the list, `{ns:identifier(` ... `)}`, is parsed strictly (see
//! [parse_invocation]).

use crate::ast::{ArgumentMap, LexError, ParseError, Value};
use crate::lexing::tokens::is_all_digits;
use crate::lexing::{tokenize_lossy, tokenize_with_locations, SpannedToken, Token};
use crate::parsing::DEFAULT_MAX_NESTING_DEPTH;

/// One argument as written, before coercion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawArgument {
    pub(crate) key: String,
    pub(crate) value: RawValue,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    Number(String),
    Quoted(String),
    Word(String),
    List(Vec<RawArgument>),
}

/// Parse a full tag invocation: `{ns:identifier(arguments)}`
///
/// Returns the identifier and its arguments. The namespace is checked for shape only. The
/// argument list ends at the first `)` outside quotes and braces; a missing `)` is an error.
pub(crate) fn parse_invocation(
    invocation: &str,
    max_depth: usize,
) -> Result<(String, Vec<RawArgument>), ParseError> {
    let open = invocation
        .find('(')
        .map_or(invocation.len(), |index| index + 1);

    let head = tokenize_segment(invocation, 0, open)?;
    let mut parser = ArgumentParser::new(&head, invocation, max_depth).ending_at(open);
    parser.expect(&Token::OpenBrace, "`{`")?;
    parser.expect_word("a namespace")?;
    parser.expect(&Token::Colon, "`:`")?;
    let identifier = parser.expect_word("a tag identifier")?;
    parser.expect(&Token::OpenParen, "`(`")?;
    parser.expect_end()?;

    let close = closing_paren(invocation, open).ok_or_else(|| ParseError::UnexpectedEnd {
        expected: "`)`",
        input: invocation.to_string(),
    })?;

    let tokens: Vec<SpannedToken> = tokenize_lossy(&invocation[open..close])
        .into_iter()
        .map(|token| shift(token, open))
        .collect();
    let arguments = ArgumentParser::new(&tokens, invocation, max_depth)
        .ending_at(close)
        .scan_lenient()?;

    let tail = tokenize_segment(invocation, close + 1, invocation.len())?;
    let mut parser = ArgumentParser::new(&tail, invocation, max_depth);
    parser.expect(&Token::CloseBrace, "`}`")?;
    parser.expect_end()?;

    Ok((identifier, arguments))
}

/// Byte index of the `)` closing an argument list that starts at `from`
fn closing_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text[from..].char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ')' if depth == 0 => return Some(from + offset),
            _ => {}
        }
    }
    None
}

/// Strictly tokenize `invocation[start..end]`, keeping positions relative to the whole text
fn tokenize_segment(
    invocation: &str,
    start: usize,
    end: usize,
) -> Result<Vec<SpannedToken>, LexError> {
    match tokenize_with_locations(&invocation[start..end]) {
        Ok(tokens) => Ok(tokens.into_iter().map(|token| shift(token, start)).collect()),
        Err(error) => Err(LexError {
            position: error.position + start,
            found: error.found,
            input: invocation.to_string(),
        }),
    }
}

fn shift((token, span): SpannedToken, offset: usize) -> SpannedToken {
    (token, span.start + offset..span.end + offset)
}

/// Recursive descent parser over a token slice
///
/// Spans index into `input`; `end` marks where the scanned segment of `input` stops.
pub(crate) struct ArgumentParser<'t> {
    tokens: &'t [SpannedToken],
    index: usize,
    input: &'t str,
    end: usize,
    max_depth: usize,
}

impl<'t> ArgumentParser<'t> {
    pub(crate) fn new(tokens: &'t [SpannedToken], input: &'t str, max_depth: usize) -> Self {
        Self {
            tokens,
            index: 0,
            input,
            end: input.len(),
            max_depth,
        }
    }

    pub(crate) fn ending_at(mut self, end: usize) -> Self {
        self.end = end;
        self
    }

    /// Scan for arguments, skipping tokens that do not start a complete one
    pub(crate) fn scan_lenient(&mut self) -> Result<Vec<RawArgument>, ParseError> {
        let mut arguments = Vec::new();
        while !self.at_end() {
            let start = self.index;
            match self.parse_argument(0) {
                Ok(argument) => {
                    arguments.push(argument);
                    self.eat(&Token::Comma);
                }
                Err(error @ ParseError::NestingTooDeep { .. }) => return Err(error),
                Err(error) => {
                    log::trace!("skipping token {} while scanning arguments: {}", start, error);
                    self.index = start + 1;
                }
            }
        }
        Ok(arguments)
    }

    /// Parse a sub-list up to and including its `}`
    fn parse_list(&mut self, depth: usize) -> Result<Vec<RawArgument>, ParseError> {
        let mut arguments = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end("an argument or `}`")),
                Some((Token::CloseBrace, _)) => {
                    self.index += 1;
                    return Ok(arguments);
                }
                Some(_) => {
                    arguments.push(self.parse_argument(depth)?);
                    self.eat(&Token::Comma);
                }
            }
        }
    }

    fn parse_argument(&mut self, depth: usize) -> Result<RawArgument, ParseError> {
        let key = match self.next() {
            Some((Token::Word(word), _)) => word.clone(),
            Some((Token::Number(digits), _)) if is_all_digits(digits) => digits.clone(),
            Some((token, span)) => {
                return Err(self.unexpected("an argument name", token, span.start))
            }
            None => return Err(self.unexpected_end("an argument name")),
        };
        self.expect_adjacent()?;

        match self.next() {
            Some((token, _)) if token.is_key_delimiter() => {}
            Some((token, span)) => return Err(self.unexpected("`=` or `:`", token, span.start)),
            None => return Err(self.unexpected_end("`=` or `:`")),
        }
        self.expect_adjacent()?;

        let value = match self.next() {
            Some((Token::Number(lexeme), _)) => RawValue::Number(lexeme.clone()),
            Some((Token::Quoted(text), _)) => RawValue::Quoted(text.clone()),
            Some((Token::Word(word), _)) => RawValue::Word(word.clone()),
            Some((Token::OpenBrace, _)) => {
                if depth + 1 > self.max_depth {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.max_depth,
                        input: self.input.to_string(),
                    });
                }
                RawValue::List(self.parse_list(depth + 1)?)
            }
            Some((token, span)) => return Err(self.unexpected("a value", token, span.start)),
            None => return Err(self.unexpected_end("a value")),
        };
        self.expect_adjacent()?;

        match self.peek() {
            None | Some((Token::Comma, _)) | Some((Token::CloseBrace, _)) => {
                Ok(RawArgument { key, value })
            }
            Some((token, span)) => Err(self.unexpected("`,` or `}`", token, span.start)),
        }
    }

    /// Fail if anything but whitespace lies between the last token taken and the next one
    fn expect_adjacent(&self) -> Result<(), ParseError> {
        let from = self
            .index
            .checked_sub(1)
            .and_then(|previous| self.tokens.get(previous))
            .map_or(0, |(_, span)| span.end);
        let to = self
            .tokens
            .get(self.index)
            .map_or(self.end, |(_, span)| span.start);
        let stray = self
            .input
            .get(from..to)
            .and_then(|gap| gap.char_indices().find(|(_, c)| !c.is_whitespace()));

        match stray {
            None => Ok(()),
            Some((offset, found)) => Err(LexError {
                position: from + offset,
                found,
                input: self.input.to_string(),
            }
            .into()),
        }
    }

    fn peek(&self) -> Option<&'t SpannedToken> {
        let tokens: &'t [SpannedToken] = self.tokens;
        tokens.get(self.index)
    }

    fn next(&mut self) -> Option<&'t SpannedToken> {
        let token = self.peek();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn eat(&mut self, expected: &Token) -> bool {
        match self.peek() {
            Some((token, _)) if token == expected => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, span)) => Err(self.unexpected(description, token, span.start)),
            None => Err(self.unexpected_end(description)),
        }
    }

    fn expect_word(&mut self, description: &'static str) -> Result<String, ParseError> {
        match self.next() {
            Some((Token::Word(word), _)) => Ok(word.clone()),
            Some((token, span)) => Err(self.unexpected(description, token, span.start)),
            None => Err(self.unexpected_end(description)),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some((token, span)) => Err(self.unexpected("end of annotation", token, span.start)),
            None => Ok(()),
        }
    }

    fn unexpected(&self, expected: &'static str, found: &Token, position: usize) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: found.to_string(),
            position,
            input: self.input.to_string(),
        }
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEnd {
            expected,
            input: self.input.to_string(),
        }
    }
}

/// Turn parsed arguments into typed values
///
/// Later duplicates overwrite earlier ones in place, so a repeated key keeps the position of its
/// first occurrence and the value of its last.
pub(crate) fn coerce(arguments: Vec<RawArgument>) -> ArgumentMap {
    let mut entries = ArgumentMap::new();
    for RawArgument { key, value } in arguments {
        let coerced = match value {
            RawValue::List(items) if items.is_empty() => None,
            RawValue::List(items) => Some(Value::Nested(coerce(items))),
            RawValue::Number(lexeme) => coerce_number(&lexeme),
            RawValue::Quoted(text) => Some(Value::Text(text)),
            RawValue::Word(_) => None,
        };
        match coerced {
            Some(value) => {
                entries.insert(key, value);
            }
            None => log::trace!("dropping argument `{}`: no typed value", key),
        }
    }
    entries
}

/// All digits -> integer, contains a period -> float
///
/// A float takes the longest valid leading part of the lexeme (`1.2.3` is `1.2`, a lone `.` is
/// `0.0`). Integers that overflow `i64` are dropped.
fn coerce_number(lexeme: &str) -> Option<Value> {
    if is_all_digits(lexeme) {
        lexeme.parse::<i64>().ok().map(Value::Integer)
    } else if lexeme.contains('.') {
        let end = lexeme
            .match_indices('.')
            .nth(1)
            .map_or(lexeme.len(), |(index, _)| index);
        Some(Value::Float(lexeme[..end].parse().unwrap_or(0.0)))
    } else {
        None
    }
}

/// Standalone argument-list parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentTokenizer {
    max_nesting_depth: usize,
}

impl Default for ArgumentTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl ArgumentTokenizer {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self { max_nesting_depth }
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Parse `key=value` parts out of an argument string, in source order
    ///
    /// Malformed parts are skipped rather than reported. The only failure is nesting deeper than
    /// the configured limit.
    pub fn parse_arguments(&self, input: &str) -> Result<ArgumentMap, ParseError> {
        let tokens = tokenize_lossy(input);
        let arguments =
            ArgumentParser::new(&tokens, input, self.max_nesting_depth).scan_lenient()?;
        Ok(coerce(arguments))
    }
}

/// Parse an argument string with the default nesting limit
pub fn parse_arguments(input: &str) -> Result<ArgumentMap, ParseError> {
    ArgumentTokenizer::default().parse_arguments(input)
}
