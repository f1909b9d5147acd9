//! Read-back of finalized packages.
//!
//! Used by callers to list what a package contains and to resolve its
//! relationship graph without a full OOXML model.

use officegen_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// A relationship as read back from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEntry {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Read-only view over package bytes.
pub struct PackageInspector<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> PackageInspector<'a> {
    /// Open package bytes as a ZIP archive.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::PackagingError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    /// Entry names in archive order.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let file = self
                .archive
                .by_index(i)
                .map_err(|e| Error::PackagingError(format!("Failed to read entry {}: {}", i, e)))?;
            names.push(file.name().to_string());
        }
        Ok(names)
    }

    /// Read one part as UTF-8 text.
    pub fn read_part(&mut self, path: &str) -> Result<String> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            Error::PackagingError(format!("File not found in archive '{}': {}", path, e))
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::PackagingError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }

    /// Relationships stored in the `.rels` part at `rels_path`.
    pub fn relationships(&mut self, rels_path: &str) -> Result<Vec<RelationshipEntry>> {
        let content = self.read_part(rels_path)?;
        Ok(element_attributes(&content, b"Relationship")?
            .into_iter()
            .map(|attrs| RelationshipEntry {
                id: attribute(&attrs, "Id").unwrap_or_default(),
                rel_type: attribute(&attrs, "Type").unwrap_or_default(),
                target: attribute(&attrs, "Target").unwrap_or_default(),
            })
            .collect())
    }

    /// Unescaped text content of every element with the given local name.
    pub fn element_texts(&mut self, path: &str, local: &str) -> Result<Vec<String>> {
        let content = self.read_part(path)?;
        element_texts(&content, local.as_bytes())
    }

    /// Unescaped attributes of every element with the given local name.
    pub fn element_attributes(
        &mut self,
        path: &str,
        local: &str,
    ) -> Result<Vec<Vec<(String, String)>>> {
        let content = self.read_part(path)?;
        element_attributes(&content, local.as_bytes())
    }
}

/// Look up an attribute value by qualified name.
pub fn attribute(attrs: &[(String, String)], key: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn element_texts(xml: &str, local: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == local => {
                current = Some(String::new());
            }
            Ok(Event::Empty(ref e)) if local_name(e.name().as_ref()) == local => {
                texts.push(String::new());
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut text) = current {
                    let unescaped = e.unescape().map_err(|e| Error::XmlError(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == local => {
                if let Some(text) = current.take() {
                    texts.push(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error reading part: {}", e))),
            _ => {}
        }
    }

    Ok(texts)
}

fn element_attributes(xml: &str, local: &[u8]) -> Result<Vec<Vec<(String, String)>>> {
    let mut reader = Reader::from_str(xml);
    let mut elements = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == local =>
            {
                elements.push(collect_attributes(e)?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error reading part: {}", e))),
            _ => {}
        }
    }

    Ok(elements)
}

fn collect_attributes(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::XmlError(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::XmlError(e.to_string()))?
            .to_string();
        attrs.push((key, value));
    }
    Ok(attrs)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
