//! Relationship graph: per-owner `rId` allocation and `.rels` rendering.

use crate::xml::XmlWriter;
use officegen_core::Result;

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs.
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
}

/// Path of the `.rels` companion for an owner part. The empty owner is the package root.
pub fn rels_path(owner: &str) -> String {
    match owner.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None if owner.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", owner),
    }
}

/// Target reference for `target`, relative to the owner's directory.
///
/// Targets outside the owner's directory are written as absolute part names.
pub fn relative_target(owner: &str, target: &str) -> String {
    let dir = owner.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    if dir.is_empty() {
        return target.to_string();
    }
    match target.strip_prefix(dir).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest.to_string(),
        None => format!("/{}", target),
    }
}

/// One directed edge from an owner part to a target part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

impl Relationship {
    /// Relationship ID (e.g. `rId1`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute archive path of the target part.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// All relationships owned by one part.
#[derive(Debug, Clone)]
pub struct Relationships {
    owner: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            rels: Vec::new(),
        }
    }

    /// Owner part path (`""` for the package root).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Append an edge and return its freshly allocated ID.
    pub fn add(&mut self, target: &str, rel_type: &str) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Archive path of this set's `.rels` part.
    pub fn path(&self) -> String {
        rels_path(&self.owner)
    }

    /// Render the `.rels` part.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Relationships", &[("xmlns", RELATIONSHIPS_NS)])?;
        for rel in &self.rels {
            let target = relative_target(&self.owner, &rel.target);
            w.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type.as_str()),
                    ("Target", target.as_str()),
                ],
            )?;
        }
        w.end()?;
        w.finish()
    }
}
