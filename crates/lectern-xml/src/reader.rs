//! Streaming reader that turns an XML document into a flat node walk.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lectern_core::{Ancestors, Attributes, DocumentSource, Node};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::{Error, Result};

/// Reads a manual one event at a time and produces [`Node`]s.
///
/// Every node carries its depth, its attributes (unescaped, in document
/// order), whether it is self-closing, and the chain of enclosing element
/// names. An empty tag such as `<imagedata/>` yields a single self-closing
/// opening node and no closing node. The reader never builds a tree.
///
/// # Example
///
/// ```rust
/// use lectern_xml::ManualReader;
///
/// let mut reader = ManualReader::from_str("<para>Hi <emphasis>there</emphasis></para>");
/// let nodes = reader.collect_nodes().unwrap();
/// assert_eq!(nodes.len(), 6);
/// assert!(nodes[3].parent("emphasis.para"));
/// ```
pub struct ManualReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Names of the elements currently open, outermost first.
    open: Vec<String>,
    ancestors: Ancestors,
    entities: HashMap<String, String>,
}

impl<'a> ManualReader<&'a [u8]> {
    /// Read a document held in memory.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &'a str) -> Self {
        Self::new(Reader::from_str(content))
    }
}

impl ManualReader<BufReader<File>> {
    /// Read a document from a file, buffered.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Opening manual");
        let file = File::open(path)?;
        Ok(Self::new(Reader::from_reader(BufReader::new(file))))
    }
}

impl<R: BufRead> ManualReader<R> {
    fn new(mut reader: Reader<R>) -> Self {
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        // Balance is checked against `open` so the error carries both names.
        config.check_end_names = false;

        Self {
            reader,
            buf: Vec::new(),
            open: Vec::new(),
            ancestors: Ancestors::root(),
            entities: HashMap::new(),
        }
    }

    /// Register replacement text for custom entities such as `&php.ini;`.
    ///
    /// The five predefined XML entities are always recognized.
    pub fn with_entities<I, K, V>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entities
            .extend(entities.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Current nesting depth (number of open elements).
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Produce the next node of the walk, or `None` at the end of input.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(Error::XmlSyntax {
                        message: err.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            };
            let position = self.reader.buffer_position();
            let depth = self.open.len();
            let entities = &self.entities;

            let node = match event {
                Event::Start(e) => {
                    let name = element_name(&e);
                    let attributes = read_attributes(&e, entities, position)?;
                    let node = Node::opening(name.clone(), depth)
                        .with_attributes(attributes)
                        .with_ancestors(self.ancestors.clone());
                    self.ancestors = self.ancestors.push(name.clone());
                    self.open.push(name);
                    node
                }
                Event::Empty(e) => {
                    let name = element_name(&e);
                    let attributes = read_attributes(&e, entities, position)?;
                    Node::opening(name, depth)
                        .self_closing()
                        .with_attributes(attributes)
                        .with_ancestors(self.ancestors.clone())
                }
                Event::End(e) => {
                    let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let Some(expected) = self.open.pop() else {
                        return Err(Error::UnexpectedEndTag { found, position });
                    };
                    if expected != found {
                        return Err(Error::MismatchedEndTag {
                            expected,
                            found,
                            position,
                        });
                    }
                    self.ancestors = self.ancestors.pop();
                    Node::closing(found, self.open.len()).with_ancestors(self.ancestors.clone())
                }
                Event::Text(e) => {
                    let text = e
                        .unescape_with(|entity| resolve_entity(entities, entity))
                        .map_err(|err| Error::XmlSyntax {
                            message: format!("Invalid text content: {}", err),
                            position: Some(position),
                        })?
                        .into_owned();
                    let node = if text.trim().is_empty() {
                        Node::whitespace(text, depth)
                    } else {
                        Node::text(text, depth)
                    };
                    node.with_ancestors(self.ancestors.clone())
                }
                Event::CData(e) => Node::cdata(String::from_utf8_lossy(&e).into_owned(), depth)
                    .with_ancestors(self.ancestors.clone()),
                Event::Comment(e) => {
                    Node::comment(String::from_utf8_lossy(&e).into_owned(), depth)
                        .with_ancestors(self.ancestors.clone())
                }
                Event::PI(e) => {
                    let target = String::from_utf8_lossy(e.target()).into_owned();
                    let content = String::from_utf8_lossy(e.content()).trim().to_string();
                    Node::processing_instruction(target, content, depth)
                        .with_ancestors(self.ancestors.clone())
                }
                Event::DocType(e) => {
                    Node::doctype(String::from_utf8_lossy(&e).trim().to_string())
                }
                Event::Decl(_) => {
                    tracing::trace!("Skipping XML declaration");
                    continue;
                }
                Event::Eof => {
                    if let Some(name) = self.open.last() {
                        return Err(Error::UnexpectedEof {
                            expected: format!("closing tag </{}>", name),
                        });
                    }
                    return Ok(None);
                }
            };
            return Ok(Some(node));
        }
    }

    /// Drain the reader into a vector.
    pub fn collect_nodes(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.next_node()? {
            nodes.push(node);
        }
        Ok(nodes)
    }
}

impl<R: BufRead> DocumentSource for ManualReader<R> {
    fn advance(&mut self) -> lectern_core::Result<Option<Node>> {
        Ok(self.next_node()?)
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn resolve_entity<'e>(entities: &'e HashMap<String, String>, entity: &str) -> Option<&'e str> {
    entities
        .get(entity)
        .map(String::as_str)
        .or_else(|| resolve_predefined_entity(entity))
}

fn read_attributes(
    e: &BytesStart<'_>,
    entities: &HashMap<String, String>,
    position: u64,
) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value: Cow<'_, str> = attr
            .unescape_value_with(|entity| resolve_entity(entities, entity))
            .map_err(|err| Error::XmlSyntax {
                message: format!("Invalid value for attribute '{}': {}", key, err),
                position: Some(position),
            })?;
        attributes.insert(key, value.into_owned());
    }
    Ok(attributes)
}
