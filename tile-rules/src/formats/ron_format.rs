use crate::formats::document::CatalogDocument;
use crate::formats::FormatParser;
use crate::{LoadError, TileCatalog};

/// A parser implementation for RON (Rusty Object Notation) catalogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RonFormatParser;

impl RonFormatParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse(&self, ron_content: &str) -> Result<TileCatalog, LoadError> {
        let document: CatalogDocument = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        document.into_catalog()
    }
}

/// Parses a catalog defined in a RON string.
pub fn parse_ron_catalog(ron_content: &str) -> Result<TileCatalog, LoadError> {
    RonFormatParser::new().parse(ron_content)
}
