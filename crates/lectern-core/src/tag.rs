/*
 * tag.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! A [`Wrapper`] shaped like a single HTML element.
//!
//! ```rust
//! use lectern_core::{HtmlTag, Wrapper};
//!
//! let tag = HtmlTag::new("pre")
//!     .with_attribute("class", "example")
//!     .wrap_slot(HtmlTag::new("code"));
//!
//! assert_eq!(tag.before(), r#"<pre class="example"><code>"#);
//! assert_eq!(tag.after(), "</code></pre>");
//! ```

use std::rc::Rc;

use crate::attributes::{AttributeValue, Attributes};
use crate::content::Wrapper;
use crate::error::{RenderError, Result};

/// Elements that never have content or a closing tag.
pub const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// An HTML element with literal before/after fragments and an optional slot.
///
/// All composition methods consume the tag and return a new value.
#[derive(Debug, Clone)]
pub struct HtmlTag {
    name: String,
    attributes: Attributes,
    before: String,
    after: String,
    slot: Option<Rc<dyn Wrapper>>,
}

impl HtmlTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            before: String::new(),
            after: String::new(),
            slot: None,
        }
    }

    /// Merge a single attribute into the tag.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.merge(key, value);
        self
    }

    /// Merge attributes into the tag. List values are concatenated.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.merge_all(attributes);
        self
    }

    /// Replace every attribute.
    pub fn replace_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Literal content placed right after the opening tag.
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = before.into();
        self
    }

    /// Literal content placed right before the closing tag.
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = after.into();
        self
    }

    /// Change the element name.
    pub fn as_tag(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Nest `slot` inside this tag, replacing any slot already attached.
    pub fn wrap_slot(mut self, slot: impl Wrapper + 'static) -> Self {
        self.slot = Some(Rc::new(slot));
        self
    }

    /// Detach the slot.
    pub fn without_slot(mut self) -> Self {
        self.slot = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.name.as_str())
    }

    /// The serialized attribute list, with a leading space when non-empty.
    pub fn attribute_list(&self) -> String {
        let rendered: Vec<String> = self
            .attributes
            .iter()
            .filter_map(|(key, value)| render_attribute(key, value))
            .collect();

        if rendered.is_empty() {
            String::new()
        } else {
            format!(" {}", rendered.join(" "))
        }
    }

    /// Flatten the tag to a string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SlotAttached`] if a slot is still attached;
    /// only a fully unwrapped tag can be flattened.
    pub fn to_html(&self) -> Result<String> {
        if self.slot.is_some() {
            return Err(RenderError::SlotAttached {
                tag: self.name.clone(),
            });
        }
        Ok(format!("{}{}", self.before(), self.after()))
    }
}

fn render_attribute(key: &str, value: &AttributeValue) -> Option<String> {
    let key = key.trim();
    let tokens: Vec<&str> = match value {
        AttributeValue::Bool(false) => return None,
        AttributeValue::Bool(true) => return Some(key.to_string()),
        AttributeValue::Str(s) => s.split_whitespace().collect(),
        AttributeValue::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect(),
    };
    Some(format!("{}=\"{}\"", key, escape_html(&tokens.join(" "))))
}

impl Wrapper for HtmlTag {
    fn before(&self) -> String {
        if self.is_void() {
            return format!("<{}{}>", self.name, self.attribute_list());
        }

        let slot = self.slot.as_ref().map(|s| s.before()).unwrap_or_default();
        format!(
            "<{}{}>{}{}",
            self.name,
            self.attribute_list(),
            self.before,
            slot
        )
    }

    fn after(&self) -> String {
        if self.is_void() {
            return String::new();
        }

        let slot = self.slot.as_ref().map(|s| s.after()).unwrap_or_default();
        format!("{}{}</{}>", slot, self.after, self.name)
    }

    fn has_slot(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Wrap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attribute_serialization() {
        let mut attrs = Attributes::new();
        attrs.insert("class", vec!["a", "b"]);
        attrs.insert("disabled", true);
        attrs.insert("hidden", false);
        attrs.insert("title", "x  y");

        let tag = HtmlTag::new("button").with_attributes(attrs);
        assert_eq!(tag.attribute_list(), r#" class="a b" disabled title="x y""#);
    }

    #[test]
    fn test_all_false_attributes_render_no_list() {
        let tag = HtmlTag::new("div").with_attribute("hidden", false);
        assert_eq!(tag.before(), "<div>");
    }

    #[test]
    fn test_list_tokens_are_trimmed() {
        let tag = HtmlTag::new("p").with_attribute("class", vec![" lead ", "", "note"]);
        assert_eq!(tag.attribute_list(), r#" class="lead note""#);
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let tag = HtmlTag::new("a").with_attribute("title", "a \"b\" & c");
        assert_eq!(tag.attribute_list(), r#" title="a &quot;b&quot; &amp; c""#);
    }

    #[test]
    fn test_before_and_after_fragments() {
        let tag = HtmlTag::new("div")
            .with_attribute("class", "note")
            .with_before("<strong>Note:</strong> ")
            .with_after("<!-- end -->");

        assert_eq!(tag.before(), r#"<div class="note"><strong>Note:</strong> "#);
        assert_eq!(tag.after(), "<!-- end --></div>");
    }

    #[test]
    fn test_void_tags_have_no_after() {
        for name in VOID_TAGS {
            let tag = HtmlTag::new(name).with_before("ignored").wrap_slot(Wrap::new("x", "y"));
            assert_eq!(tag.before(), format!("<{}>", name));
            assert_eq!(tag.after(), "");
        }
    }

    #[test]
    fn test_with_attributes_concatenates_lists() {
        let tag = HtmlTag::new("code")
            .with_attribute("class", vec!["function"])
            .with_attributes([("class", vec!["php"])].into_iter().collect());
        assert_eq!(tag.attribute_list(), r#" class="function php""#);
    }

    #[test]
    fn test_replace_attributes() {
        let tag = HtmlTag::new("code")
            .with_attribute("class", "function")
            .replace_attributes([("id", "x")].into_iter().collect());
        assert_eq!(tag.attribute_list(), r#" id="x""#);
    }

    #[test]
    fn test_as_tag_keeps_attributes() {
        let tag = HtmlTag::new("div").with_attribute("id", "intro").as_tag("section");
        assert_eq!(tag.name(), "section");
        assert_eq!(tag.to_html().unwrap(), r#"<section id="intro"></section>"#);
    }

    #[test]
    fn test_slot_composition() {
        let tag = HtmlTag::new("pre")
            .with_before("$ ")
            .wrap_slot(HtmlTag::new("code").with_attribute("class", "shell"));

        assert_eq!(tag.before(), r#"<pre>$ <code class="shell">"#);
        assert_eq!(tag.after(), "</code></pre>");
        assert!(tag.has_slot());
    }

    #[test]
    fn test_to_html_fails_with_slot() {
        let tag = HtmlTag::new("pre").wrap_slot(HtmlTag::new("code"));
        let err = tag.to_html().unwrap_err();
        assert!(matches!(err, RenderError::SlotAttached { ref tag } if tag == "pre"));
    }

    #[test]
    fn test_to_html_after_unwrapping() {
        let tag = HtmlTag::new("pre").wrap_slot(HtmlTag::new("code")).without_slot();
        assert_eq!(tag.to_html().unwrap(), "<pre></pre>");
    }

    #[test]
    fn test_void_to_html() {
        let tag = HtmlTag::new("img").with_attribute("src", "a.png");
        assert_eq!(tag.to_html().unwrap(), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
