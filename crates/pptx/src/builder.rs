//! Presentation package builder.

use officegen_core::{Error, Result};
use officegen_opc::{
    content_type, relationship_type, validate_text, Compression, Package, PackageOptions,
    XmlWriter,
};

/// Archive path of the presentation root part.
pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Numeric ID of the first slide in `sldIdLst`.
const FIRST_SLIDE_ID: usize = 256;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// 4:3 slide size in EMUs.
const SLIDE_WIDTH: &str = "9144000";
const SLIDE_HEIGHT: &str = "6858000";

/// Archive path of the 1-based slide `number`.
pub fn slide_path(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Builder for presentation packages.
#[derive(Debug, Clone, Default)]
pub struct PresentationBuilder {
    options: PackageOptions,
}

/// An entry of the presentation's slide list.
struct SlideEntry {
    id: usize,
    r_id: String,
}

impl PresentationBuilder {
    /// Create a builder with default package options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given package options.
    pub fn with_options(mut self, options: PackageOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the archive compression.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.options = self.options.with_compression(compression);
        self
    }

    /// Build a package with one slide per text, in order.
    ///
    /// An empty list yields a valid presentation with no slides.
    pub fn build<S: AsRef<str>>(&self, slides: &[S]) -> Result<Vec<u8>> {
        for (i, slide) in slides.iter().enumerate() {
            validate_text(slide.as_ref()).map_err(|e| slide_context(i + 1, e))?;
        }

        let mut package = Package::with_options(self.options.clone());
        package.add_relationship("", PRESENTATION_PATH, relationship_type::OFFICE_DOCUMENT);

        let entries: Vec<SlideEntry> = (0..slides.len())
            .map(|i| SlideEntry {
                id: FIRST_SLIDE_ID + i,
                r_id: package.add_relationship(
                    PRESENTATION_PATH,
                    &slide_path(i + 1),
                    relationship_type::SLIDE,
                ),
            })
            .collect();

        package.add_part(
            PRESENTATION_PATH,
            presentation_xml(&entries)?,
            content_type::PML_PRESENTATION_MAIN,
        )?;

        for (i, slide) in slides.iter().enumerate() {
            package.add_part(
                slide_path(i + 1),
                slide_xml(slide.as_ref())?,
                content_type::PML_SLIDE,
            )?;
        }

        log::debug!("Building presentation with {} slides", slides.len());
        package.finalize()
    }
}

/// Build a presentation with default options.
pub fn build_presentation<S: AsRef<str>>(slides: &[S]) -> Result<Vec<u8>> {
    PresentationBuilder::new().build(slides)
}

fn slide_context(number: usize, error: Error) -> Error {
    match error {
        Error::EncodingError(msg) => Error::EncodingError(format!("slide {}: {}", number, msg)),
        other => other,
    }
}

fn presentation_xml(entries: &[SlideEntry]) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    w.start("p:sldIdLst", &[])?;
    for entry in entries {
        let id = entry.id.to_string();
        w.empty("p:sldId", &[("id", id.as_str()), ("r:id", entry.r_id.as_str())])?;
    }
    w.end()?;

    w.empty("p:sldSz", &[("cx", SLIDE_WIDTH), ("cy", SLIDE_HEIGHT)])?;
    w.empty("p:notesSz", &[("cx", SLIDE_HEIGHT), ("cy", SLIDE_WIDTH)])?;
    w.end()?;
    w.finish()
}

fn slide_xml(text: &str) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;

    // Group shape properties required by every shape tree
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end()?;
    w.empty("p:grpSpPr", &[])?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "2"), ("name", "TextBox 1")])?;
    w.empty("p:cNvSpPr", &[("txBox", "1")])?;
    w.empty("p:nvPr", &[])?;
    w.end()?;
    w.empty("p:spPr", &[])?;

    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    w.start("a:p", &[])?;
    w.start("a:r", &[])?;
    w.text_element("a:t", &[], text)?;
    w.end()?; // a:r
    w.end()?; // a:p
    w.end()?; // p:txBody

    w.end()?; // p:sp
    w.end()?; // p:spTree
    w.end()?; // p:cSld
    w.end()?; // p:sld
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use officegen_opc::inspect::attribute;
    use officegen_opc::{rels_path, PackageInspector};

    const EMPTY: [&str; 0] = [];

    #[test]
    fn test_slide_path() {
        assert_eq!(slide_path(3), "ppt/slides/slide3.xml");
    }

    #[test]
    fn test_hello_world() {
        let bytes = build_presentation(&["Hello", "World & Friends"]).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();

        assert_eq!(
            inspector.entry_names().unwrap(),
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "ppt/_rels/presentation.xml.rels",
                "ppt/presentation.xml",
                "ppt/slides/slide1.xml",
                "ppt/slides/slide2.xml",
            ]
        );
        assert_eq!(
            inspector.element_texts("ppt/slides/slide1.xml", "t").unwrap(),
            vec!["Hello"]
        );
        assert_eq!(
            inspector.element_texts("ppt/slides/slide2.xml", "t").unwrap(),
            vec!["World & Friends"]
        );

        let raw = inspector.read_part("ppt/slides/slide2.xml").unwrap();
        assert!(raw.contains("<a:t>World &amp; Friends</a:t>"));
    }

    #[test]
    fn test_slide_ids_resolve_to_slides() {
        let slides = ["one", "two", "three"];
        let bytes = build_presentation(&slides).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();

        let sld_ids = inspector
            .element_attributes(PRESENTATION_PATH, "sldId")
            .unwrap();
        let rels = inspector
            .relationships(&rels_path(PRESENTATION_PATH))
            .unwrap();
        assert_eq!(sld_ids.len(), slides.len());
        assert_eq!(rels.len(), slides.len());

        for (i, attrs) in sld_ids.iter().enumerate() {
            assert_eq!(attribute(attrs, "id"), Some((256 + i).to_string()));

            let r_id = attribute(attrs, "r:id").unwrap();
            let rel = rels.iter().find(|r| r.id == r_id).unwrap();
            assert_eq!(rel.rel_type, relationship_type::SLIDE);
            assert_eq!(rel.target, format!("slides/slide{}.xml", i + 1));
            assert_eq!(
                inspector
                    .element_texts(&slide_path(i + 1), "t")
                    .unwrap(),
                vec![slides[i]]
            );
        }

        let mut r_ids: Vec<_> = rels.iter().map(|r| r.id.clone()).collect();
        r_ids.sort();
        r_ids.dedup();
        assert_eq!(r_ids.len(), slides.len());
    }

    #[test]
    fn test_empty_presentation() {
        let bytes = build_presentation(&EMPTY).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();

        let names = inspector.entry_names().unwrap();
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"_rels/.rels".to_string()));
        assert!(names.contains(&PRESENTATION_PATH.to_string()));
        assert!(!names.iter().any(|n| n.starts_with("ppt/slides/")));

        assert!(inspector
            .element_attributes(PRESENTATION_PATH, "sldId")
            .unwrap()
            .is_empty());
        assert_eq!(
            inspector
                .element_attributes(PRESENTATION_PATH, "sldIdLst")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_root_relationship() {
        let bytes = build_presentation(&["x"]).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();
        let rels = inspector.relationships("_rels/.rels").unwrap();

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].id, "rId1");
        assert_eq!(rels[0].rel_type, relationship_type::OFFICE_DOCUMENT);
        assert_eq!(rels[0].target, PRESENTATION_PATH);
    }

    #[test]
    fn test_content_type_overrides() {
        let bytes = build_presentation(&["x", "y"]).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();
        let overrides = inspector
            .element_attributes("[Content_Types].xml", "Override")
            .unwrap();

        let find = |part: &str| {
            overrides
                .iter()
                .find(|attrs| attribute(attrs, "PartName").as_deref() == Some(part))
                .and_then(|attrs| attribute(attrs, "ContentType"))
        };
        assert_eq!(
            find("/ppt/presentation.xml").as_deref(),
            Some(content_type::PML_PRESENTATION_MAIN)
        );
        assert_eq!(
            find("/ppt/slides/slide2.xml").as_deref(),
            Some(content_type::PML_SLIDE)
        );
    }

    #[test]
    fn test_markup_in_text_round_trips() {
        let text = r#"<p:sp>"quoted" & 'single' </a:t>"#;
        let bytes = build_presentation(&[text]).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();

        assert_eq!(
            inspector.element_texts("ppt/slides/slide1.xml", "t").unwrap(),
            vec![text]
        );
        assert_eq!(
            inspector.element_attributes("ppt/slides/slide1.xml", "sp").unwrap().len(),
            1
        );
    }

    #[test]
    fn test_line_endings_round_trip() {
        let text = "first\r\nsecond\rthird\n\tfourth";
        let bytes = build_presentation(&[text]).unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();

        let slide = inspector.read_part("ppt/slides/slide1.xml").unwrap();
        assert!(slide.contains("first&#13;\nsecond&#13;third"));
        assert_eq!(
            inspector.element_texts("ppt/slides/slide1.xml", "t").unwrap(),
            vec![text]
        );
    }

    #[test]
    fn test_invalid_character_rejected() {
        let err = build_presentation(&["fine", "bad\u{1}"]).unwrap_err();
        match err {
            Error::EncodingError(msg) => assert!(msg.starts_with("slide 2:")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_deterministic() {
        let slides = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            build_presentation(&slides).unwrap(),
            build_presentation(&slides).unwrap()
        );
    }

    #[test]
    fn test_stored_builder() {
        let bytes = PresentationBuilder::new()
            .with_compression(Compression::Stored)
            .build(&["plain"])
            .unwrap();
        let mut inspector = PackageInspector::new(&bytes).unwrap();
        assert_eq!(
            inspector.element_texts("ppt/slides/slide1.xml", "t").unwrap(),
            vec!["plain"]
        );
    }
}
