/*
 * node.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * The node contract: one immutable step of a document walk.
 */

//! Document walk events.
//!
//! A [`Node`] describes one step of an in-order walk over a structured
//! document: an opening tag, a closing tag, a run of text, and so on.
//! Nodes are produced by a [`DocumentSource`](crate::DocumentSource) and
//! are only ever read by the engine and by generators.
//!
//! Every node carries its [`Ancestors`], the chain of enclosing element
//! names, so generators can ask structural questions such as "is this text
//! directly inside a `methodname` inside a `methodsynopsis`?" without
//! keeping their own stack:
//!
//! ```rust
//! use lectern_core::{Ancestors, Node};
//!
//! let ancestors = Ancestors::from_path("methodname.methodsynopsis.refsect1");
//! let node = Node::text("strlen", 3).with_ancestors(ancestors);
//!
//! assert!(node.parent("methodname"));
//! assert!(node.parent("methodname.methodsynopsis"));
//! assert!(!node.parent("methodsynopsis"));
//! assert!(node.within("refsect1"));
//! ```

use std::rc::Rc;

use crate::attributes::{AttributeValue, Attributes};

/// The kind of a walk step.
///
/// This set is closed: the engine matches on it exhaustively, so adding a
/// kind is a compile-time obligation for every dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doctype,
    OpeningElement,
    ClosingElement,
    Text,
    Whitespace,
    CData,
    ProcessingInstruction,
    Comment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Doctype => "doctype",
            NodeKind::OpeningElement => "opening-element",
            NodeKind::ClosingElement => "closing-element",
            NodeKind::Text => "text",
            NodeKind::Whitespace => "whitespace",
            NodeKind::CData => "cdata",
            NodeKind::ProcessingInstruction => "processing-instruction",
            NodeKind::Comment => "comment",
        }
    }
}

/// Chain of enclosing element names, innermost first.
///
/// Frames are shared between nodes, so pushing an element is O(1) and a
/// node's chain stays valid after the source moves on.
#[derive(Debug, Clone, Default)]
pub struct Ancestors {
    head: Option<Rc<Frame>>,
}

#[derive(Debug)]
struct Frame {
    name: String,
    parent: Ancestors,
}

impl Ancestors {
    /// The empty chain (document root level).
    pub fn root() -> Self {
        Self { head: None }
    }

    /// Build a chain from a dot-separated path, innermost name first.
    pub fn from_path(path: &str) -> Self {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .fold(Ancestors::root(), |chain, name| chain.push(name))
    }

    /// Return a new chain with `name` as the innermost element.
    pub fn push(&self, name: impl Into<String>) -> Self {
        Self {
            head: Some(Rc::new(Frame {
                name: name.into(),
                parent: self.clone(),
            })),
        }
    }

    /// Return the chain without its innermost element.
    pub fn pop(&self) -> Self {
        match &self.head {
            Some(frame) => frame.parent.clone(),
            None => Ancestors::root(),
        }
    }

    /// The innermost enclosing element name.
    pub fn innermost(&self) -> Option<&str> {
        self.head.as_deref().map(|frame| frame.name.as_str())
    }

    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate over the names, innermost first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let frame = cursor?;
            cursor = frame.parent.head.as_deref();
            Some(frame.name.as_str())
        })
    }

    /// Whether the chain starts with the dot-separated `path`.
    ///
    /// `"a.b.c"` matches when the innermost ancestor is `a`, its parent is
    /// `b`, and its grandparent is `c`. An empty path never matches.
    pub fn matches(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut names = self.names();
        path.split('.').all(|segment| names.next() == Some(segment))
    }

    /// Whether any ancestor has the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// One immutable step of the document walk.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    name: String,
    depth: usize,
    attributes: Attributes,
    self_closing: bool,
    value: String,
    ancestors: Ancestors,
}

impl Node {
    /// Create a node of the given kind with no payload.
    pub fn new(kind: NodeKind, name: impl Into<String>, depth: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            depth,
            attributes: Attributes::new(),
            self_closing: false,
            value: String::new(),
            ancestors: Ancestors::root(),
        }
    }

    pub fn doctype(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Doctype, "", 0).with_value(value)
    }

    pub fn opening(name: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::OpeningElement, name, depth)
    }

    pub fn closing(name: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::ClosingElement, name, depth)
    }

    pub fn text(value: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::Text, "", depth).with_value(value)
    }

    pub fn whitespace(value: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::Whitespace, "", depth).with_value(value)
    }

    pub fn cdata(value: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::CData, "", depth).with_value(value)
    }

    pub fn comment(value: impl Into<String>, depth: usize) -> Self {
        Self::new(NodeKind::Comment, "", depth).with_value(value)
    }

    pub fn processing_instruction(
        target: impl Into<String>,
        value: impl Into<String>,
        depth: usize,
    ) -> Self {
        Self::new(NodeKind::ProcessingInstruction, target, depth).with_value(value)
    }

    /// Mark an opening element as self-closing (`<name/>`).
    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_ancestors(mut self, ancestors: Ancestors) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Element or instruction name; empty for text-like kinds.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Only meaningful for opening elements.
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Raw (unescaped) payload of text-like kinds.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn ancestors(&self) -> &Ancestors {
        &self.ancestors
    }

    pub fn is_doctype(&self) -> bool {
        self.kind == NodeKind::Doctype
    }

    pub fn is_opening_element(&self) -> bool {
        self.kind == NodeKind::OpeningElement
    }

    pub fn is_closing_element(&self) -> bool {
        self.kind == NodeKind::ClosingElement
    }

    pub fn is_text_content(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == NodeKind::Whitespace
    }

    pub fn is_cdata(&self) -> bool {
        self.kind == NodeKind::CData
    }

    pub fn is_processing_instruction(&self) -> bool {
        self.kind == NodeKind::ProcessingInstruction
    }

    pub fn is_comment(&self) -> bool {
        self.kind == NodeKind::Comment
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Get a string-valued attribute.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get_str(key)
    }

    /// Whether the enclosing elements match `path` (innermost first).
    ///
    /// See [`Ancestors::matches`].
    pub fn parent(&self, path: &str) -> bool {
        self.ancestors.matches(path)
    }

    /// Whether any enclosing element has the given name.
    pub fn within(&self, name: &str) -> bool {
        self.ancestors.contains(name)
    }

    /// The value as a quoted, escaped string literal for generated data files.
    pub fn export_value(&self) -> String {
        serde_json::Value::String(self.value.clone()).to_string()
    }
}
