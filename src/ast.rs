//! Data model produced by the parser
//!
//! Everything here is transient: built per query and handed to the caller. Nothing is shared or
//! persisted between queries.

pub mod annotation;
pub mod error;
pub mod value;

pub use annotation::ParsedAnnotation;
pub use error::{LexError, ParseError};
pub use value::{ArgumentMap, Value};
