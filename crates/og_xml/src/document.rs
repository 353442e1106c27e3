//! A minimal XML element tree.
//!
//! Documents are parsed completely before reading starts, so the reader can
//! skip unknown subtrees without tracking nesting. Text content, comments
//! and processing instructions are ignored, graph documents carry
//! everything in attributes.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use std::io;

use og_graph::codec::CodecError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

// -----------------------------------------------------------------------------
// Element

/// An element with ordered attributes and child elements.
///
/// # Examples
///
/// ```
/// use og_xml::Element;
///
/// let root = Element::parse(r#"<a x="1"><b/>text<c y="&lt;"/></a>"#).unwrap();
/// assert_eq!(root.attribute("x"), Some("1"));
/// assert_eq!(root.children.len(), 2);
/// assert_eq!(root.child("c").unwrap().attribute("y"), Some("<"));
///
/// let text = root.to_xml(None).unwrap();
/// assert!(text.ends_with(r#"<a x="1"><b/><c y="&lt;"/></a>"#));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    #[inline]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    #[inline]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first child called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    // -------------------------------------------------------------------------
    // Parsing

    /// Parses a document with exactly one root element.
    pub fn parse(text: &str) -> Result<Element, CodecError> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event().map_err(format_error)? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CodecError::Format("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CodecError::Format(alloc::format!(
                "element `{}` is not closed",
                open.name
            )));
        }
        root.ok_or_else(|| CodecError::Format("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, CodecError> {
        let name = start.name();
        let name = core::str::from_utf8(name.as_ref()).map_err(format_error)?;
        let mut element = Element::new(name);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(format_error)?;
            let key = core::str::from_utf8(attribute.key.as_ref()).map_err(format_error)?;
            let value = attribute.unescape_value().map_err(format_error)?;
            element.attributes.push((key.to_string(), value.into_owned()));
        }
        Ok(element)
    }

    // -------------------------------------------------------------------------
    // Output

    /// Writes the declaration and the element tree.
    ///
    /// `indent` is the number of spaces per level, `None` writes everything
    /// on one line.
    pub fn write_to<W: io::Write>(&self, out: W, indent: Option<usize>) -> Result<(), CodecError> {
        let mut writer = match indent {
            Some(width) => Writer::new_with_indent(out, b' ', width),
            None => Writer::new(out),
        };
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(format_error)?;
        self.write_element(&mut writer)
    }

    /// Returns the document as text, see [`Element::write_to`].
    pub fn to_xml(&self, indent: Option<usize>) -> Result<String, CodecError> {
        let mut out = Vec::new();
        self.write_to(&mut out, indent)?;
        String::from_utf8(out).map_err(format_error)
    }

    fn write_element<W: io::Write>(&self, writer: &mut Writer<W>) -> Result<(), CodecError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(format_error);
        }
        writer.write_event(Event::Start(start)).map_err(format_error)?;
        for child in &self.children {
            child.write_element(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(format_error)
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(CodecError::Format("more than one root element".to_string()));
        }
        None => *root = Some(element),
    }
    Ok(())
}

#[inline]
fn format_error(error: impl fmt::Display) -> CodecError {
    CodecError::Format(error.to_string())
}

#[cfg(test)]
mod tests {
    use og_graph::codec::CodecError;

    use super::Element;

    #[test]
    fn nested_elements_and_attributes() {
        let text = r#"<?xml version="1.0"?>
            <!-- comment -->
            <Complex name="Root" type="app::Person">
                <Properties>
                    <Simple name="name" value="Ann &amp; Bob"/>
                </Properties>
            </Complex>"#;
        let root = Element::parse(text).unwrap();
        assert_eq!(root.name, "Complex");
        assert_eq!(root.attribute("type"), Some("app::Person"));
        let simple = &root.child("Properties").unwrap().children[0];
        assert_eq!(simple.attribute("value"), Some("Ann & Bob"));
        assert_eq!(simple.attribute("missing"), None);
    }

    #[test]
    fn indented_output_parses_back() {
        let root = Element::new("Collection")
            .with_attribute("name", "Root")
            .with_child(
                Element::new("Items")
                    .with_child(Element::new("Simple").with_attribute("value", "a\"b"))
                    .with_child(Element::new("Null")),
            );

        let text = root.to_xml(Some(2)).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("\n  <Items>"));
        assert_eq!(Element::parse(&text).unwrap(), root);

        let compact = root.to_xml(None).unwrap();
        assert!(!compact.contains('\n'));
        assert_eq!(Element::parse(&compact).unwrap(), root);
    }

    #[test]
    fn malformed_documents() {
        let format = |text: &str| matches!(Element::parse(text), Err(CodecError::Format(_)));
        assert!(format(""));
        assert!(format("just text"));
        assert!(format("<a><b></a>"));
        assert!(format("<a>"));
        assert!(format("<a/><b/>"));
        assert!(format(r#"<a x="1" x="2"/>"#));
    }
}
