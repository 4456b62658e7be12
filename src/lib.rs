//! # annotag
//!
//! Parses docblock annotation shorthand into ordered, typed configuration trees.
//!
//! Form builders describe fields with tags on classes and properties, for example
//! `select(items='a,b', size=5)` or `{flux:input(size=40, attrs={class='wide'})}`. This crate
//! turns those raw tag values into [ParsedAnnotation](ast::ParsedAnnotation) trees and answers
//! tag queries about classes through an injected [MetadataProvider](metadata::MetadataProvider).
//!
//! ## Layout
//!
//! - [lexing]: logos tokenizer for the shorthand grammar
//! - [parsing]: [ExpressionParser](parsing::ExpressionParser) for whole tag values and
//!   [ArgumentTokenizer](parsing::ArgumentTokenizer) for `key=value` lists
//! - [ast]: the parsed data model and its errors
//! - [metadata]: the provider capability, property enumeration and a data-backed
//!   [MetadataTable](metadata::MetadataTable)
//! - [resolver]: [AnnotationResolver](resolver::AnnotationResolver) and its optional cache
//! - [config] / [formats]: layered TOML configuration and JSON / YAML rendering

pub mod ast;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod metadata;
pub mod parsing;
pub mod resolver;

pub use ast::{ArgumentMap, ParseError, ParsedAnnotation, Value};
pub use metadata::{MetadataProvider, MetadataTable, PropertyEnumerator};
pub use parsing::{parse_arguments, ArgumentTokenizer, ExpressionParser};
pub use resolver::{AnnotationResolver, PropertySelector, Resolution, ResolveError};
