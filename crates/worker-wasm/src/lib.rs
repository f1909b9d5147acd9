//! WASM-compatible wrapper for OOXML package generation.
//!
//! This crate exposes the package builders to JavaScript for use in
//! Cloudflare Workers. Every call returns the package bytes; persisting them
//! is left to the worker.

use officegen_core::{Command, CommandParser, DocumentKind};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A generated package together with its transport metadata.
#[wasm_bindgen]
#[derive(Debug)]
pub struct GeneratedPackage {
    kind: DocumentKind,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl GeneratedPackage {
    /// `"presentation"` or `"spreadsheet"`.
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        kind_name(self.kind).to_string()
    }

    /// MIME type for the HTTP response.
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.kind.mime_type().to_string()
    }

    /// File extension without the leading dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.kind.extension().to_string()
    }

    /// The package bytes.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.bytes[..])
    }
}

/// Preview of what a free-text command would generate.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandPreview {
    /// `"presentation"` or `"spreadsheet"`.
    pub kind: String,
    /// Slide texts, for presentation commands.
    pub slides: Option<Vec<String>>,
    /// Cell rows, for spreadsheet commands.
    pub rows: Option<Vec<Vec<String>>>,
}

/// Build a presentation from an array of slide texts.
///
/// # Returns
/// The .pptx bytes as a `Uint8Array`, or throws on error.
#[wasm_bindgen]
pub fn build_presentation(slides: JsValue) -> Result<Vec<u8>, JsValue> {
    let slides: Vec<String> = serde_wasm_bindgen::from_value(slides)
        .map_err(|e| JsValue::from_str(&format!("Invalid slides array: {}", e)))?;

    officegen_pptx::build_presentation(&slides).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build a spreadsheet from an array of string arrays.
///
/// # Returns
/// The .xlsx bytes as a `Uint8Array`, or throws on error.
#[wasm_bindgen]
pub fn build_spreadsheet(rows: JsValue) -> Result<Vec<u8>, JsValue> {
    let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&format!("Invalid rows array: {}", e)))?;

    officegen_xlsx::build_spreadsheet(&rows).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a free-text command and build the package it asks for.
#[wasm_bindgen]
pub fn build_from_command(text: &str) -> Result<GeneratedPackage, JsValue> {
    build_from_command_impl(text).map_err(|e| JsValue::from_str(&e))
}

/// Parse a free-text command without building anything.
///
/// # Returns
/// A `CommandPreview` object, or `null` when the text is not a command.
#[wasm_bindgen]
pub fn preview_command(text: &str) -> Result<JsValue, JsValue> {
    match preview_command_impl(text) {
        Some(preview) => serde_wasm_bindgen::to_value(&preview)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e))),
        None => Ok(JsValue::NULL),
    }
}

fn build_from_command_impl(text: &str) -> Result<GeneratedPackage, String> {
    let command = CommandParser::new()
        .parse(text)
        .ok_or_else(|| "Not a generation command".to_string())?;

    let kind = command.kind();
    let bytes = match command {
        Command::Presentation(slides) => officegen_pptx::build_presentation(&slides),
        Command::Spreadsheet(rows) => officegen_xlsx::build_spreadsheet(&rows),
    }
    .map_err(|e| e.to_string())?;

    Ok(GeneratedPackage { kind, bytes })
}

fn preview_command_impl(text: &str) -> Option<CommandPreview> {
    let command = CommandParser::new().parse(text)?;
    let kind = kind_name(command.kind()).to_string();

    Some(match command {
        Command::Presentation(slides) => CommandPreview {
            kind,
            slides: Some(slides.into_iter().map(|s| s.text).collect()),
            rows: None,
        },
        Command::Spreadsheet(rows) => CommandPreview {
            kind,
            slides: None,
            rows: Some(rows.into_iter().map(|r| r.cells).collect()),
        },
    })
}

fn kind_name(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Presentation => "presentation",
        DocumentKind::Spreadsheet => "spreadsheet",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_command() {
        let package = build_from_command_impl("gerar excel dados: Nome,Idade|Ana,30").unwrap();

        assert_eq!(package.kind, DocumentKind::Spreadsheet);
        assert!(package.bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_build_from_non_command() {
        assert!(build_from_command_impl("bom dia").is_err());
    }

    #[test]
    fn test_build_from_command_with_bad_text() {
        let err = build_from_command_impl("gerar ppt slides: ok; bad\u{2}").unwrap_err();
        assert!(err.contains("slide 2"));
    }

    #[test]
    fn test_preview_command() {
        let preview = preview_command_impl("criar apresentação slides: A; B").unwrap();

        assert_eq!(preview.kind, "presentation");
        assert_eq!(preview.slides, Some(vec!["A".to_string(), "B".to_string()]));
        assert!(preview.rows.is_none());
    }
}
