//! Parsing of raw annotation values
//!
//! [expression] turns a whole tag value (`select(items='a,b', size=5)`) into a
//! [ParsedAnnotation](crate::ast::ParsedAnnotation); [arguments] handles the parenthesized
//! `key=value` list inside it, recursing into `{...}` sub-lists.

pub mod arguments;
pub mod expression;

pub use arguments::{parse_arguments, ArgumentTokenizer};
pub use expression::ExpressionParser;

/// Namespace used to wrap bare `name(args)` forms into a full tag invocation
pub const DEFAULT_NAMESPACE: &str = "flux";

/// How many `{...}` levels an argument list may nest
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;
