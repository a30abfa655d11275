//! A minimal element tree for response envelopes.
//!
//! Envelopes are small and their shape depends on the operation, so they are
//! parsed into a generic tree of [`XmlNode`]s instead of per-operation
//! structs. Absent elements are simply `None` from [`XmlNode::child`].
//! Attributes are dropped and namespace prefixes stripped, since the
//! provider carries everything in element text.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;

/// Why a document could not be turned into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The markup itself is broken (bad syntax, mismatched end tag, bad escape).
    #[error("{source} at position {position}")]
    Syntax {
        /// The underlying parser error.
        #[source]
        source: quick_xml::Error,
        /// Byte offset near the failure.
        position: u64,
    },

    /// A second top-level element follows the root.
    #[error("content after the root element")]
    ContentAfterRoot,

    /// An end tag with no open element.
    #[error("unexpected closing tag")]
    UnexpectedClosingTag,

    /// The document ends while an element is still open.
    #[error("unexpected end of document inside <{name}>")]
    UnclosedElement {
        /// Name of the innermost open element.
        name: String,
    },

    /// The document contains no element at all.
    #[error("document has no root element")]
    NoRoot,
}

/// An element with its trimmed text content and child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct XmlNode {
    /// The local element name.
    pub name: String,
    /// Concatenated, unescaped text directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Creates an element with no text and no children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding only text.
    #[must_use]
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns an [`XmlError`] when the markup is malformed, end tags do not
    /// match, an element is left open, or there is no root.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mturk_api::clients::XmlNode;
    ///
    /// let root = XmlNode::parse("<A><B>1</B><B>2</B></A>").unwrap();
    /// assert_eq!(root.name, "A");
    /// assert_eq!(root.children_named("B").count(), 2);
    /// assert_eq!(root.child_text("B"), Some("1"));
    /// ```
    pub fn parse(document: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(document);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|source| XmlError::Syntax { source, position })?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(XmlError::ContentAfterRoot);
                    }
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    stack.push(Self::new(name));
                }
                Event::Empty(empty) => {
                    let name = String::from_utf8_lossy(empty.local_name().as_ref()).into_owned();
                    Self::attach(&mut stack, &mut root, Self::new(name))?;
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or(XmlError::UnexpectedClosingTag)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|source| XmlError::Syntax {
                        source,
                        position: reader.buffer_position(),
                    })?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::UnclosedElement {
                name: open.name.clone(),
            });
        }
        root.ok_or(XmlError::NoRoot)
    }

    fn attach(stack: &mut [Self], root: &mut Option<Self>, node: Self) -> Result<(), XmlError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            Ok(())
        } else if root.is_some() {
            Err(XmlError::ContentAfterRoot)
        } else {
            *root = Some(node);
            Ok(())
        }
    }

    /// Returns the first child element named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns every child element named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of the first child element named `name`.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Returns `true` if this element has child elements.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Converts the tree into JSON.
    ///
    /// Leaves become strings. Elements with children become objects keyed by
    /// child name; a name that repeats becomes an array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        if !self.has_children() {
            return serde_json::Value::String(self.text.clone());
        }
        let mut map = serde_json::Map::new();
        for child in &self.children {
            let value = child.to_json();
            match map.get_mut(&child.name) {
                Some(serde_json::Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = serde_json::Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }
        serde_json::Value::Object(map)
    }
}
