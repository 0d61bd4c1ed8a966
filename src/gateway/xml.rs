use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::gateway::errors::GatewayError;

/// A parsed XML element with its attributes, text and child elements.
///
/// Gateway responses are small (one page of transactions at most), so the
/// whole document is held in memory and walked by tag name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>
}

impl XmlNode {
    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> Result<Self, GatewayError> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event().map_err(GatewayError::xml)? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let node = Self::open(&start)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let mut node = stack.pop().ok_or_else(|| GatewayError::xml("unbalanced closing tag"))?;
                    //NOTE: Text between child elements is indentation, leaf text is kept verbatim
                    if !node.children.is_empty() {
                        node.text.clear();
                    }
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text.unescape().map_err(GatewayError::xml)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(node) = stack.last() {
            return Err(GatewayError::xml(format!("unclosed element <{}>", node.name)));
        }

        root.ok_or_else(|| GatewayError::xml("document has no root element"))
    }

    fn open(start: &BytesStart) -> Result<Self, GatewayError> {
        let mut attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(GatewayError::xml)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(GatewayError::xml)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Self::default()
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Braintree marks absent values with `nil="true"`.
    pub fn is_nil(&self) -> bool {
        self.attribute("nil") == Some("true")
    }

    /// Text content, or `None` when the element is nil or empty.
    pub fn value(&self) -> Option<&str> {
        if self.is_nil() || self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}
