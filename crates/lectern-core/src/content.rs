/*
 * content.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * What a generator returns when it renders a node.
 */

//! Content units.
//!
//! Rendering a node yields a [`Content`]: either plain text that is written
//! immediately, or a [`Wrapper`] whose `before` half is written now and whose
//! `after` half is staged by the engine until the matching closing element
//! arrives. Wrappers compose through a single slot, so a chain such as
//! `<pre><code>` ... `</code></pre>` is one unit.

use std::fmt;
use std::rc::Rc;

use crate::error::{RenderError, Result};
use crate::tag::HtmlTag;

/// Markup that opens now and closes later.
pub trait Wrapper: fmt::Debug {
    /// Content written when the element opens, including any slot's `before`.
    fn before(&self) -> String;

    /// Content written when the element closes, including any slot's `after`.
    fn after(&self) -> String;

    /// Whether another wrapper is nested inside this one.
    fn has_slot(&self) -> bool;
}

/// The result of rendering one node.
#[derive(Debug)]
pub enum Content {
    Text(String),
    Wrapper(Box<dyn Wrapper>),
}

impl Content {
    /// Content that writes nothing.
    pub fn empty() -> Self {
        Content::Text(String::new())
    }

    /// Whether this is empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Text(text) if text.is_empty())
    }

    pub fn wrapper(wrapper: impl Wrapper + 'static) -> Self {
        Content::Wrapper(Box::new(wrapper))
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Wrap> for Content {
    fn from(wrap: Wrap) -> Self {
        Content::wrapper(wrap)
    }
}

impl From<HtmlTag> for Content {
    fn from(tag: HtmlTag) -> Self {
        Content::wrapper(tag)
    }
}

/// A plain before/after pair with an optional nested slot.
///
/// Used for generated output that is not shaped like a markup element,
/// such as the fields of a data file.
#[derive(Debug, Clone, Default)]
pub struct Wrap {
    before: String,
    after: String,
    slot: Option<Rc<dyn Wrapper>>,
}

impl Wrap {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
            slot: None,
        }
    }

    /// Nest `slot` inside this wrapper, replacing any slot already attached.
    pub fn wrap_slot(mut self, slot: impl Wrapper + 'static) -> Self {
        self.slot = Some(Rc::new(slot));
        self
    }

    /// Detach the slot.
    pub fn without_slot(mut self) -> Self {
        self.slot = None;
        self
    }

    /// Flatten to a string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SlotAttached`] if a slot is still attached.
    pub fn to_text(&self) -> Result<String> {
        if self.slot.is_some() {
            return Err(RenderError::SlotAttached {
                tag: "wrapper".to_string(),
            });
        }
        Ok(format!("{}{}", self.before, self.after))
    }
}

impl Wrapper for Wrap {
    fn before(&self) -> String {
        match &self.slot {
            Some(slot) => format!("{}{}", self.before, slot.before()),
            None => self.before.clone(),
        }
    }

    fn after(&self) -> String {
        match &self.slot {
            Some(slot) => format!("{}{}", slot.after(), self.after),
            None => self.after.clone(),
        }
    }

    fn has_slot(&self) -> bool {
        self.slot.is_some()
    }
}
