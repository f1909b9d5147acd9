//! Open Packaging Conventions assembler.
//!
//! Collects XML parts and their relationship graph in memory and serializes
//! them into a ZIP container with a content-type manifest.

pub mod content_types;
pub mod inspect;
pub mod package;
pub mod relationships;
pub mod xml;

pub use content_types::content_type;
pub use inspect::{PackageInspector, RelationshipEntry};
pub use package::{Compression, Package, PackageOptions};
pub use relationships::{relationship_type, rels_path};
pub use xml::{escape_attribute, escape_text, validate_text, XmlWriter};
