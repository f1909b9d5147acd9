//! `[Content_Types].xml` rendering.

use crate::xml::XmlWriter;
use officegen_core::Result;

/// Archive path of the content-type manifest.
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// MIME types used by generated parts.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PML_PRESENTATION_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const PML_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SML_SHEET_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const SML_WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
}

/// Default MIME type for a well-known extension.
fn default_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "rels" => Some(content_type::RELATIONSHIPS),
        "xml" => Some(content_type::XML),
        _ => None,
    }
}

/// Extension of the last path segment, lower-cased.
fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Content-type registry: extension defaults plus per-part overrides.
#[derive(Debug, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part. Adds a default for its extension if none exists yet and
    /// an override when the part's type differs from that default.
    pub fn register(&mut self, path: &str, mime_type: &str) {
        let Some(ext) = extension(path) else {
            self.add_override(path, mime_type);
            return;
        };

        let default = match self.defaults.iter().find(|(e, _)| *e == ext) {
            Some((_, mime)) => mime.clone(),
            None => {
                let mime = default_for_extension(&ext).unwrap_or(mime_type).to_string();
                self.defaults.push((ext, mime.clone()));
                mime
            }
        };

        if default != mime_type {
            self.add_override(path, mime_type);
        }
    }

    fn add_override(&mut self, path: &str, mime_type: &str) {
        self.overrides
            .push((format!("/{}", path), mime_type.to_string()));
    }

    /// Render the manifest.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
        for (ext, mime) in &self.defaults {
            w.empty(
                "Default",
                &[("Extension", ext.as_str()), ("ContentType", mime.as_str())],
            )?;
        }
        for (part_name, mime) in &self.overrides {
            w.empty(
                "Override",
                &[("PartName", part_name.as_str()), ("ContentType", mime.as_str())],
            )?;
        }
        w.end()?;
        w.finish()
    }
}
