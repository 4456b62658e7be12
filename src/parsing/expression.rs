//! Annotation expression parsing
//!
//! A raw tag value is normalized into a full tag invocation before it is parsed:
//!
//! 1. Surrounding whitespace is trimmed. Nothing left means the tag has no arguments: `Flag`.
//! 2. A value with neither `(` nor `)` gets an empty argument list appended (`input` becomes
//!    `input()`).
//! 3. A value that does not start with `{` is wrapped with the configured namespace
//!    (`input()` becomes `{flux:input()}`), so bare and fully-qualified forms share one grammar.
//!
//! The only exception is a bare argument list such as `outer={inner=2}`. It has no identifier to
//! wrap, so it is parsed directly as the arguments of an anonymous invocation (empty type).
//!
//! Only the call shape must match; the argument list inside is scanned leniently and parts it
//! cannot read are dropped.

use super::arguments::{coerce, parse_invocation, ArgumentTokenizer};
use super::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_NAMESPACE};
use crate::ast::{ParseError, ParsedAnnotation};
use crate::config::ParserConfig;
use crate::lexing::{tokenize_lossy, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionParser {
    namespace: String,
    max_nesting_depth: usize,
}

impl Default for ExpressionParser {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            max_nesting_depth: config.max_nesting_depth,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// The standalone argument parser sharing this parser's nesting limit
    pub fn arguments(&self) -> ArgumentTokenizer {
        ArgumentTokenizer::new(self.max_nesting_depth)
    }

    /// Parse every occurrence of one tag
    ///
    /// No occurrences is a `Flag`, a single occurrence is parsed as itself and several become a
    /// `Collection` in the same order.
    pub fn parse_occurrences<S: AsRef<str>>(
        &self,
        values: &[S],
    ) -> Result<ParsedAnnotation, ParseError> {
        match values {
            [] => Ok(ParsedAnnotation::Flag),
            [single] => self.parse(single.as_ref()),
            many => many
                .iter()
                .map(|value| self.parse(value.as_ref()))
                .collect::<Result<Vec<_>, _>>()
                .map(ParsedAnnotation::Collection),
        }
    }

    /// Parse a single raw tag value
    pub fn parse(&self, input: &str) -> Result<ParsedAnnotation, ParseError> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(ParsedAnnotation::Flag);
        }

        if is_bare_argument_list(text) {
            let config = self.arguments().parse_arguments(text).map_err(rejected)?;
            return Ok(ParsedAnnotation::structured("", config));
        }

        let invocation = self.normalize(text);
        log::trace!("normalized `{}` to `{}`", text, invocation);

        let (type_name, arguments) =
            parse_invocation(&invocation, self.max_nesting_depth).map_err(rejected)?;

        Ok(ParsedAnnotation::structured(type_name, coerce(arguments)))
    }

    fn normalize(&self, text: &str) -> String {
        let mut invocation = text.to_string();
        if !text.contains(|c| c == '(' || c == ')') {
            invocation.push_str("()");
        }
        if !invocation.starts_with('{') {
            invocation = format!("{{{}:{}}}", self.namespace, invocation);
        }
        invocation
    }
}

/// A `key=...` list written without any call wrapper
fn is_bare_argument_list(text: &str) -> bool {
    if text.starts_with('{') || text.contains(|c| c == '(' || c == ')') {
        return false;
    }
    matches!(
        tokenize_lossy(text).as_slice(),
        [(key, _), (Token::Equals, _), ..] if key.is_key()
    )
}

fn rejected(error: ParseError) -> ParseError {
    log::debug!("rejecting malformed annotation: {}", error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    #[test]
    fn test_normalize_bare_identifier() {
        let parser = ExpressionParser::new();
        assert_eq!(parser.normalize("input"), "{flux:input()}");
        assert_eq!(parser.normalize("input(size=1)"), "{flux:input(size=1)}");
        assert_eq!(parser.normalize("{v:input(size=1)}"), "{v:input(size=1)}");
    }

    #[test]
    fn test_custom_namespace_is_used_for_wrapping() {
        let parser = ExpressionParser::new().with_namespace("form");
        assert_eq!(parser.normalize("select"), "{form:select()}");
    }

    #[test]
    fn test_bare_argument_list_detection() {
        assert!(is_bare_argument_list("outer={inner=2}"));
        assert!(is_bare_argument_list("0='first'"));
        assert!(!is_bare_argument_list("input"));
        assert!(!is_bare_argument_list("input(size=1)"));
        assert!(!is_bare_argument_list("{flux:input()}"));
        assert!(!is_bare_argument_list("flux:input"));
    }

    #[test]
    fn test_identifier_without_arguments() {
        let annotation = ExpressionParser::new().parse("checkbox").unwrap();
        assert_eq!(annotation.type_name(), Some("checkbox"));
        assert!(annotation.config().unwrap().is_empty());
    }

    #[test]
    fn test_dotted_identifier() {
        let annotation = ExpressionParser::new()
            .parse("field.select(items='a,b')")
            .unwrap();
        assert_eq!(annotation.type_name(), Some("field.select"));
        assert_eq!(annotation.get("items"), Some(&Value::Text("a,b".to_string())));
    }

    #[test]
    fn test_trailing_text_is_rejected() {
        let error = ExpressionParser::new().parse("input() extra").unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_nesting_limit_comes_from_parser() {
        let parser = ExpressionParser::new().with_max_nesting_depth(1);
        assert!(parser.parse("f(a={b=1})").is_ok());
        let error = parser.parse("f(a={b={c=1}})").unwrap_err();
        assert!(matches!(error, ParseError::NestingTooDeep { limit: 1, .. }));
    }

    #[test]
    fn test_occurrences() {
        let parser = ExpressionParser::new();
        let none: [&str; 0] = [];
        assert_eq!(parser.parse_occurrences(&none).unwrap(), ParsedAnnotation::Flag);
        assert_eq!(
            parser.parse_occurrences(&["input"]).unwrap(),
            parser.parse("input").unwrap()
        );
        let many = parser.parse_occurrences(&["input", ""]).unwrap();
        assert_eq!(many.occurrences().map(|items| items.len()), Some(2));
    }

    #[test]
    fn test_occurrences_fail_on_any_malformed_value() {
        let parser = ExpressionParser::new();
        assert!(parser.parse_occurrences(&["input", "foo(bar="]).is_err());
    }
}
