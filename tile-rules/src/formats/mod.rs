//! Parsers for the catalog document formats.

pub mod document;
pub mod parser;
pub use parser::FormatParser;

pub mod json_format;
pub mod ron_format;
