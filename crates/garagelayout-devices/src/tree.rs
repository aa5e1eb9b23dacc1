//! Small helpers over `quick-xml`: an indented element writer and a minimal
//! element tree for reading.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

use crate::error::{XmlError, XmlResult};

/// Writes a document with two-space indentation.
pub(crate) struct XmlDoc {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlDoc {
    /// Starts a document with a UTF-8 XML declaration.
    pub(crate) fn new() -> XmlResult<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub(crate) fn open(&mut self, name: &str) -> XmlResult<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> XmlResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes `<name>value</name>` with the value escaped.
    pub(crate) fn field(&mut self, name: &str, value: &str) -> XmlResult<()> {
        self.open(name)?;
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        self.close(name)
    }

    pub(crate) fn finish(self) -> XmlResult<String> {
        Ok(String::from_utf8(self.writer.into_inner().into_inner())?)
    }
}

/// Parsed element: name, concatenated text and child elements. Attributes
/// are not needed by any of the documents and are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Node {
    pub name: String,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    pub(crate) fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first child called `name`, or empty.
    pub(crate) fn child_text(&self, name: &str) -> String {
        self.child(name)
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default()
    }
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(XmlError::Malformed("multiple root elements".to_string()))
    }
}

/// Parses a document into its root element.
pub(crate) fn parse(xml: &str) -> XmlResult<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Node::named(e.name().as_ref())),
            Event::Empty(e) => attach(&mut stack, &mut root, Node::named(e.name().as_ref()))?,
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(XmlError::Malformed("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| XmlError::Malformed("document has no root element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writer_layout() {
        let mut doc = XmlDoc::new().unwrap();
        doc.open("Devices").unwrap();
        doc.open("Device").unwrap();
        doc.field("Name", "A & B").unwrap();
        doc.close("Device").unwrap();
        doc.close("Devices").unwrap();
        assert_eq!(
            doc.finish().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Devices>\n  <Device>\n    <Name>A &amp; B</Name>\n  </Device>\n</Devices>"
        );
    }

    #[test]
    fn test_parse_tree() {
        let root = parse("<a><b> x &lt; y </b><c/><b>2</b></a>").unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.child_text("b"), "x < y");
        assert_eq!(root.children_named("b").count(), 2);
        assert!(root.child("c").is_some());
        assert_eq!(root.child_text("missing"), "");
    }

    #[test]
    fn test_parse_rejects_truncated_and_mismatched() {
        assert!(parse("<a><b>1</b>").is_err());
        assert!(parse("<a><b>1</c></a>").is_err());
        assert!(parse("").is_err());
    }
}
