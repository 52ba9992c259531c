use crate::formats::{json_format::JsonFormatParser, ron_format::RonFormatParser, FormatParser};
use crate::{LoadError, TileCatalog};
use std::path::Path;

/// Picks a parser from the file extension (`.ron` or `.json`).
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Loads a tile catalog from a RON or JSON file.
///
/// # Errors
///
/// `LoadError::UnsupportedFormat` for unknown extensions, `LoadError::Io` when
/// the file cannot be read, and the parser's errors otherwise.
pub fn load_from_file(path: &Path) -> Result<TileCatalog, LoadError> {
    let parser = parser_for_path(path)?;
    let content = std::fs::read_to_string(path)?;
    log::debug!(
        "Parsing catalog {:?} as {}",
        path,
        parser.format_name()
    );
    parser.parse(&content)
}
