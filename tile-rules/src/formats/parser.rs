use crate::{LoadError, TileCatalog};

/// Trait defining the interface for format-specific catalog parsers.
///
/// Implementors turn a document (RON, JSON, ...) into a validated
/// [`TileCatalog`].
pub trait FormatParser {
    /// Parses catalog content into a `TileCatalog`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::ParseError` when the document is malformed and
    /// `LoadError::InvalidData` when it is well-formed but inconsistent
    /// (duplicate names, unknown tiles or directions).
    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError>;

    /// Returns a descriptive name for this parser format.
    fn format_name(&self) -> &'static str;
}
