//! Domain types for the content that drives package generation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The kind of document a package represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// PresentationML package (.pptx).
    Presentation,
    /// SpreadsheetML package (.xlsx).
    Spreadsheet,
}

impl DocumentKind {
    /// Detect the kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Presentation),
            "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Presentation => "pptx",
            Self::Spreadsheet => "xlsx",
        }
    }

    /// MIME type to set on whatever transport carries the package bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Presentation => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// One slide: an opaque text run placed as the slide body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub text: String,
}

impl Slide {
    /// Create a slide from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AsRef<str> for Slide {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// One spreadsheet row: cell values in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row from cell values.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a delimited line into a row, trimming each cell.
    pub fn from_delimited(line: &str, delimiter: char) -> Self {
        Self::new(line.split(delimiter).map(str::trim))
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl AsRef<[String]> for Row {
    fn as_ref(&self) -> &[String] {
        &self.cells
    }
}

/// Decode caller bytes as UTF-8 without lossy replacement.
pub fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        Error::EncodingError(format!(
            "invalid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_extension("PPTX"),
            Some(DocumentKind::Presentation)
        );
        assert_eq!(
            DocumentKind::from_extension("xlsx"),
            Some(DocumentKind::Spreadsheet)
        );
        assert_eq!(DocumentKind::from_extension("ppt"), None);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(
            DocumentKind::Presentation.mime_type(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(
            DocumentKind::Spreadsheet.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_row_from_delimited() {
        let row = Row::from_delimited("Ana, 30 ,São Paulo", ',');
        assert_eq!(row.cells, vec!["Ana", "30", "São Paulo"]);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_utf8(&[b'o', b'k', 0xFF]).unwrap_err();
        assert!(matches!(err, Error::EncodingError(_)));
        assert!(err.to_string().contains("byte 2"));
        assert_eq!(decode_utf8("São".as_bytes()).unwrap(), "São");
    }
}
