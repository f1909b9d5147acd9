//! Escaping XML writer used to render every package part.
//!
//! Caller-supplied strings only reach a part through [`XmlWriter::text`] or an
//! attribute value, both of which validate and escape the input.

use officegen_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

/// Escape text node content: `&`, `<`, `>` and carriage returns.
///
/// A raw CR would be folded into LF by the reader's line-end handling.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    escape_whitespace(quick_xml::escape::partial_escape(raw), &['\r'])
}

/// Escape an attribute value: `&`, `<`, `>`, `"`, `'` and tab/LF/CR.
///
/// Raw whitespace in attribute values is normalized to spaces when read.
pub fn escape_attribute(raw: &str) -> Cow<'_, str> {
    escape_whitespace(quick_xml::escape::escape(raw), &['\t', '\n', '\r'])
}

/// Replace each of `chars` with its numeric character reference.
fn escape_whitespace<'a>(escaped: Cow<'a, str>, chars: &[char]) -> Cow<'a, str> {
    if !escaped.contains(chars) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        if chars.contains(&c) {
            out.push_str(&format!("&#{};", c as u32));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Whether a character matches the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Reject strings that cannot be represented in an XML document.
pub fn validate_text(text: &str) -> Result<()> {
    match text.chars().enumerate().find(|(_, c)| !is_xml_char(*c)) {
        Some((pos, c)) => Err(Error::EncodingError(format!(
            "character U+{:04X} at position {} is not allowed in XML",
            c as u32, pos
        ))),
        None => Ok(()),
    }
}

/// Streaming XML writer that tracks open elements.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl XmlWriter {
    /// Start a new document with a standalone UTF-8 declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self {
            writer,
            open: Vec::new(),
        })
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attributes)?;
        self.writer
            .write_event(Event::Start(element))
            .map_err(xml_error)?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attributes)?;
        self.writer
            .write_event(Event::Empty(element))
            .map_err(xml_error)
    }

    /// Write escaped text inside the current element.
    pub fn text(&mut self, text: &str) -> Result<()> {
        validate_text(text)?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
            .map_err(xml_error)
    }

    /// Close the most recently opened element.
    pub fn end(&mut self) -> Result<()> {
        let name = self.open.pop().ok_or_else(|| {
            Error::PackagingError("attempted to close an element that was never opened".into())
        })?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// Write `<name attrs>text</name>`.
    pub fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<()> {
        self.start(name, attributes)?;
        self.text(text)?;
        self.end()
    }

    /// Finish the document and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some(name) = self.open.last() {
            return Err(Error::PackagingError(format!(
                "unclosed element <{}> in XML part",
                name
            )));
        }
        Ok(self.writer.into_inner())
    }
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> Result<BytesStart<'a>> {
    let mut element = BytesStart::new(name);
    for (key, value) in attributes {
        validate_text(value)?;
        let escaped = escape_attribute(value);
        element.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }
    Ok(element)
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(build: impl FnOnce(&mut XmlWriter) -> Result<()>) -> String {
        let mut writer = XmlWriter::new().unwrap();
        build(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_text(r#"say "hi" it's"#), r#"say "hi" it's"#);
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"<"a" & 'b'>"#),
            "&lt;&quot;a&quot; &amp; &apos;b&apos;&gt;"
        );
    }

    #[test]
    fn test_escape_line_endings() {
        assert_eq!(escape_text("a\r\nb\tc"), "a&#13;\nb\tc");
        assert_eq!(escape_attribute("a\r\nb\tc"), "a&#13;&#10;b&#9;c");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_carriage_return_survives_in_text() {
        let xml = render(|w| w.text_element("t", &[], "a\r\nb"));
        assert!(xml.ends_with("<t>a&#13;\nb</t>"));
        assert!(!xml.contains('\r'));
    }

    #[test]
    fn test_whitespace_survives_in_attribute() {
        let xml = render(|w| w.empty("c", &[("v", "x\ty\r\nz")]));
        assert!(xml.ends_with(r#"<c v="x&#9;y&#13;&#10;z"/>"#));
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("tab\tline\nreturn\r ok ✓ 😀").is_ok());
        let err = validate_text("bell\u{7}").unwrap_err();
        assert!(matches!(err, Error::EncodingError(_)));
        assert!(err.to_string().contains("U+0007"));
        assert!(validate_text("\u{FFFE}").is_err());
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|w| w.text_element("t", &[], "<b>&</b>"));
        assert!(xml.ends_with("<t>&lt;b&gt;&amp;&lt;/b&gt;</t>"));
    }

    #[test]
    fn test_attribute_injection_is_escaped() {
        let xml = render(|w| w.empty("c", &[("r", r#"A1" evil="1"#)]));
        assert!(xml.ends_with(r#"<c r="A1&quot; evil=&quot;1"/>"#));
    }

    #[test]
    fn test_declaration() {
        let xml = render(|w| w.empty("root", &[]));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
    }

    #[test]
    fn test_unclosed_element_fails() {
        let mut writer = XmlWriter::new().unwrap();
        writer.start("open", &[]).unwrap();
        assert!(matches!(
            writer.finish(),
            Err(Error::PackagingError(_))
        ));
    }

    #[test]
    fn test_unbalanced_end_fails() {
        let mut writer = XmlWriter::new().unwrap();
        assert!(writer.end().is_err());
    }

    #[test]
    fn test_invalid_text_rejected() {
        let mut writer = XmlWriter::new().unwrap();
        writer.start("t", &[]).unwrap();
        assert!(matches!(
            writer.text("null\u{0}byte"),
            Err(Error::EncodingError(_))
        ));
    }
}
