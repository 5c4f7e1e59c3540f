/*
 * attributes.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! Ordered attribute maps shared by nodes and HTML tags.

use indexmap::IndexMap;

/// The value of a single attribute.
///
/// Element attributes read from a document are always strings. Generators
/// building output tags may also use booleans (bare or omitted attributes)
/// and lists (space-separated tokens such as `class`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl AttributeValue {
    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Merge `other` into this value.
    ///
    /// Lists concatenate, a string joins a list as a new token, and two
    /// strings become a two-element list. Any combination involving a
    /// boolean takes `other`.
    pub fn merge(self, other: AttributeValue) -> AttributeValue {
        match (self, other) {
            (AttributeValue::List(mut a), AttributeValue::List(b)) => {
                a.extend(b);
                AttributeValue::List(a)
            }
            (AttributeValue::List(mut a), AttributeValue::Str(b)) => {
                a.push(b);
                AttributeValue::List(a)
            }
            (AttributeValue::Str(a), AttributeValue::List(b)) => {
                let mut merged = Vec::with_capacity(b.len() + 1);
                merged.push(a);
                merged.extend(b);
                AttributeValue::List(merged)
            }
            (AttributeValue::Str(a), AttributeValue::Str(b)) => AttributeValue::List(vec![a, b]),
            (_, other) => other,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::List(value)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(value: Vec<&str>) -> Self {
        AttributeValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Attribute map that preserves insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert a value, replacing any existing value for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Merge a value into the map using [`AttributeValue::merge`].
    pub fn merge(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        let key = key.into();
        let value = value.into();
        let merged = match self.entries.get(&key) {
            Some(existing) => existing.clone().merge(value),
            None => value,
        };
        self.entries.insert(key, merged);
    }

    /// Merge every entry of `other` into this map.
    pub fn merge_all(&mut self, other: Attributes) {
        for (key, value) in other.entries {
            self.merge(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Get a string-valued attribute.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let attrs: Attributes = [("b", "1"), ("a", "2"), ("c", "3")].into_iter().collect();
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_concatenates_lists() {
        let mut attrs = Attributes::new();
        attrs.insert("class", vec!["a", "b"]);
        attrs.merge("class", vec!["c"]);
        attrs.merge("class", "d");
        assert_eq!(
            attrs.get("class"),
            Some(&AttributeValue::List(vec![
                "a".into(),
                "b".into(),
                "c".into(),
                "d".into()
            ]))
        );
    }

    #[test]
    fn test_merge_two_strings_becomes_list() {
        let mut attrs = Attributes::new();
        attrs.insert("class", "x");
        attrs.merge("class", "y");
        assert_eq!(
            attrs.get("class"),
            Some(&AttributeValue::List(vec!["x".into(), "y".into()]))
        );
    }

    #[test]
    fn test_merge_boolean_replaces() {
        let mut attrs = Attributes::new();
        attrs.insert("hidden", "until-found");
        attrs.merge("hidden", false);
        assert_eq!(attrs.get("hidden"), Some(&AttributeValue::Bool(false)));
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let attrs: Attributes = [("disabled", AttributeValue::Bool(true))].into_iter().collect();
        assert_eq!(attrs.get_str("disabled"), None);
        assert!(attrs.contains("disabled"));
    }
}
