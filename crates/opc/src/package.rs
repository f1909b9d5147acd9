//! In-memory OPC package and its ZIP serialization.

use crate::content_types::{ContentTypes, CONTENT_TYPES_PATH, content_type};
use crate::relationships::Relationships;
use officegen_core::{Error, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Compression applied to every archive entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    Stored,
    /// Deflate, the usual choice for office documents.
    #[default]
    Deflated,
}

impl From<Compression> for CompressionMethod {
    fn from(value: Compression) -> Self {
        match value {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Options controlling archive output.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    pub compression: Compression,
}

impl PackageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry compression.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

/// One named entry of the package.
#[derive(Debug, Clone)]
struct Part {
    path: String,
    data: Vec<u8>,
    content_type: String,
}

/// An OPC package under construction.
///
/// Content parts are written in registration order after the content-type
/// manifest and the relationship parts.
#[derive(Debug, Default)]
pub struct Package {
    options: PackageOptions,
    parts: Vec<Part>,
    relationships: Vec<Relationships>,
}

impl Package {
    /// Create an empty package with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty package with the given options.
    pub fn with_options(options: PackageOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Register a part.
    pub fn add_part(
        &mut self,
        path: impl Into<String>,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let path = path.into();
        let path = path.trim_start_matches('/').to_string();

        if path.is_empty() {
            return Err(Error::PackagingError("part path must not be empty".into()));
        }
        if self.contains(&path) {
            return Err(Error::DuplicatePartError(path));
        }
        if is_reserved(&path) {
            return Err(Error::DuplicatePartError(format!(
                "{} (reserved for generated package metadata)",
                path
            )));
        }

        log::debug!("Registered part {} ({} bytes)", path, data.len());
        self.parts.push(Part {
            path,
            data,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    /// Record a relationship from `owner` (`""` for the package root) to
    /// `target` and return its ID.
    pub fn add_relationship(&mut self, owner: &str, target: &str, rel_type: &str) -> String {
        let owner = owner.trim_start_matches('/');
        let target = target.trim_start_matches('/');

        let index = match self.relationships.iter().position(|r| r.owner() == owner) {
            Some(index) => index,
            None => {
                self.relationships.push(Relationships::new(owner));
                self.relationships.len() - 1
            }
        };

        let id = self.relationships[index].add(target, rel_type);
        log::debug!("Allocated {} from '{}' to {}", id, owner, target);
        id
    }

    /// Whether a part exists at `path`. Part names compare ASCII
    /// case-insensitively.
    pub fn contains(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.parts.iter().any(|p| p.path.eq_ignore_ascii_case(path))
    }

    /// Relationship sets, package root first.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationships> {
        let root = self.relationships.iter().filter(|r| r.owner().is_empty());
        let others = self.relationships.iter().filter(|r| !r.owner().is_empty());
        root.chain(others)
    }

    /// Serialize the package into ZIP bytes.
    ///
    /// Emits `[Content_Types].xml`, then every `.rels` part (package root
    /// first, present even when empty), then content parts in registration
    /// order.
    pub fn finalize(self) -> Result<Vec<u8>> {
        self.check_references()?;

        let mut rels_parts = Vec::new();
        if !self.relationships.iter().any(|r| r.owner().is_empty()) {
            let root = Relationships::new("");
            rels_parts.push((root.path(), root.to_xml()?));
        }
        for rels in self.relationships() {
            rels_parts.push((rels.path(), rels.to_xml()?));
        }

        let mut content_types = ContentTypes::new();
        for (path, _) in &rels_parts {
            content_types.register(path, content_type::RELATIONSHIPS);
        }
        for part in &self.parts {
            content_types.register(&part.path, &part.content_type);
        }
        let manifest = content_types.to_xml()?;

        let options = FileOptions::default()
            .compression_method(self.options.compression.into())
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        write_entry(&mut zip, CONTENT_TYPES_PATH, &manifest, options)?;
        for (path, data) in &rels_parts {
            write_entry(&mut zip, path, data, options)?;
        }
        for part in &self.parts {
            write_entry(&mut zip, &part.path, &part.data, options)?;
        }

        let bytes = zip
            .finish()
            .map_err(|e| Error::PackagingError(format!("Failed to finish archive: {}", e)))?
            .into_inner();

        log::debug!(
            "Finalized package: {} entries, {} bytes",
            1 + rels_parts.len() + self.parts.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Every relationship owner and target must be a registered part.
    fn check_references(&self) -> Result<()> {
        for rels in &self.relationships {
            if !rels.owner().is_empty() && !self.contains(rels.owner()) {
                return Err(Error::PackagingError(format!(
                    "relationship owner '{}' is not a part of the package",
                    rels.owner()
                )));
            }
            for rel in rels.iter() {
                if !self.contains(rel.target()) {
                    return Err(Error::PackagingError(format!(
                        "relationship {} of '{}' targets missing part '{}'",
                        rel.id(),
                        rels.owner(),
                        rel.target()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Paths the package generates itself.
fn is_reserved(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path == CONTENT_TYPES_PATH.to_ascii_lowercase()
        || (path.ends_with(".rels") && (path.starts_with("_rels/") || path.contains("/_rels/")))
}

fn write_entry<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    data: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::PackagingError(format!("Failed to start entry '{}': {}", path, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::PackagingError(format!("Failed to write entry '{}': {}", path, e)))
}
