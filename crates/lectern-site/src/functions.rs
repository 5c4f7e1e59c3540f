/*
 * functions.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Function index generator and loader.
 */

//! The function index.
//!
//! [`FunctionIndex`] is a generator that writes one JSON record per
//! `methodsynopsis` found directly inside a `refsect1`:
//!
//! ```json
//! [
//! {"description":"Get string length","return":["int"],"name":"strlen","p1":{"optional":false,"variadic":false,"types":["string"],"name":"string"}}
//! ]
//! ```
//!
//! Records are produced while the manual streams past, so every field is a
//! wrapper or text fragment emitted at the right node. [`FunctionCatalog`]
//! reads the file back.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use lectern_core::{Content, FileSink, Generator, Node, NodeKind, SharedSink, Sink, Wrap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};

/// Generator for `functions.json`.
///
/// The index never chunks: every record goes to the one sink created up
/// front, which the generator also writes to in `set_up` and `tear_down`.
pub struct FunctionIndex<S = FileSink> {
    sink: SharedSink<S>,
    records: usize,
    param_number: usize,
    first_in_list: bool,
    /// Text of the most recent `refpurpose`, until a synopsis claims it.
    description: Option<String>,
}

impl FunctionIndex<FileSink> {
    /// Create the index file at [`SiteConfig::function_index_path`].
    pub fn create(config: &SiteConfig) -> Result<Self> {
        let path = config.function_index_path();
        let sink = FileSink::with_capacity(&path, config.sink_buffer_size)?;
        tracing::debug!(path = %path.display(), "Created function index");
        Ok(Self::with_sink(sink))
    }
}

impl<S: Sink + 'static> FunctionIndex<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink: SharedSink::new(sink),
            records: 0,
            param_number: 1,
            first_in_list: true,
            description: None,
        }
    }

    pub fn path(&self) -> &Path {
        self.sink.path()
    }

    /// Number of function records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    fn open_list(&mut self, key: &str) -> Content {
        self.first_in_list = true;
        Wrap::new(format!(",\"{}\":[", key), "]").into()
    }

    fn list_item(&mut self, text: &str) -> Content {
        let separator = if self.first_in_list { "" } else { "," };
        self.first_in_list = false;
        format!("{}{}", separator, Value::from(text.trim())).into()
    }

    fn render_element(&mut self, node: &Node) -> Content {
        match node.name() {
            "refpurpose" => {
                self.description = Some(String::new());
                Content::empty()
            }
            "methodsynopsis" if node.parent("refsect1") => {
                let description = self.description.take().map(|text| collapse_whitespace(&text));
                let separator = if self.records == 0 { "" } else { ",\n" };
                self.records += 1;
                self.param_number = 1;
                Wrap::new(
                    format!("{}{{\"description\":{}", separator, Value::from(description)),
                    "}",
                )
                .into()
            }
            "type" if node.parent("methodsynopsis.refsect1") => self.open_list("return"),
            "type" if node.parent("methodparam.methodsynopsis.refsect1") => self.open_list("types"),
            "methodparam" if node.parent("methodsynopsis.refsect1") => {
                let number = self.param_number;
                self.param_number += 1;
                Wrap::new(
                    format!(
                        ",\"p{}\":{{\"optional\":{},\"variadic\":{}",
                        number,
                        node.attribute_str("choice") == Some("opt"),
                        node.attribute_str("rep") == Some("repeat"),
                    ),
                    "}",
                )
                .into()
            }
            "parameter"
                if node.parent("methodparam.methodsynopsis.refsect1")
                    && node.attribute_str("role") == Some("reference") =>
            {
                ",\"reference\":true".into()
            }
            "initializer" if node.parent("methodparam.methodsynopsis.refsect1") => {
                Wrap::new(",\"default\":\"", "\"").into()
            }
            _ => Content::empty(),
        }
    }

    fn render_text(&mut self, node: &Node) -> Content {
        if node.within("refpurpose") {
            if let Some(description) = self.description.as_mut() {
                description.push_str(node.value());
            }
            return Content::empty();
        }

        if node.parent("type.methodsynopsis.refsect1")
            || node.parent("type.type.methodsynopsis.refsect1")
            || node.parent("type.methodparam.methodsynopsis.refsect1")
            || node.parent("type.type.methodparam.methodsynopsis.refsect1")
        {
            return self.list_item(node.value());
        }

        if node.parent("methodname.methodsynopsis.refsect1")
            || node.parent("parameter.methodparam.methodsynopsis.refsect1")
        {
            return format!(",\"name\":{}", node.export_value()).into();
        }

        if in_default_value(node) {
            // Inside the quotes opened by the initializer wrapper.
            let quoted = node.export_value();
            return quoted[1..quoted.len() - 1].to_string().into();
        }

        Content::empty()
    }
}

impl<S: Sink + 'static> Generator for FunctionIndex<S> {
    fn name(&self) -> &str {
        "function-index"
    }

    fn set_up(&mut self) -> lectern_core::Result<()> {
        self.records = 0;
        self.param_number = 1;
        self.description = None;
        self.sink.write("[\n")
    }

    fn stream(&mut self, _node: &Node) -> lectern_core::Result<Box<dyn Sink>> {
        Ok(Box::new(self.sink.clone()))
    }

    fn render(&mut self, node: &Node) -> lectern_core::Result<Content> {
        let content = match node.kind() {
            NodeKind::OpeningElement => self.render_element(node),
            NodeKind::Text | NodeKind::CData => self.render_text(node),
            _ => Content::empty(),
        };
        Ok(content)
    }

    fn tear_down(&mut self) -> lectern_core::Result<()> {
        tracing::debug!(
            records = self.records,
            path = %self.sink.path().display(),
            "Function index complete"
        );
        self.sink.write("\n]\n")
    }
}

/// Whether the node sits inside an `initializer` that opened a `default` field.
fn in_default_value(node: &Node) -> bool {
    let mut names = node
        .ancestors()
        .names()
        .skip_while(|name| *name != "initializer");
    names.next() == Some("initializer")
        && ["methodparam", "methodsynopsis", "refsect1"]
            .iter()
            .all(|expected| names.next() == Some(*expected))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One parameter of a function signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub variadic: bool,
    /// Passed by reference.
    #[serde(default)]
    pub reference: bool,
    #[serde(default)]
    pub default: Option<String>,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.types.is_empty() {
            write!(f, "{} ", self.types.join("|"))?;
        }
        if self.reference {
            write!(f, "&")?;
        }
        if self.variadic {
            write!(f, "...")?;
        }
        write!(f, "${}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// One signature of a function.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub description: Option<String>,
    pub returns: Vec<String>,
    pub parameters: Vec<Parameter>,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut optional = 0;
        for (i, parameter) in self.parameters.iter().enumerate() {
            let separator = if i == 0 { "" } else { ", " };
            if parameter.optional {
                write!(f, "[{}", separator)?;
                optional += 1;
            } else {
                write!(f, "{}", separator)?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, "{})", "]".repeat(optional))?;
        if !self.returns.is_empty() {
            write!(f, ": {}", self.returns.join("|"))?;
        }
        Ok(())
    }
}

/// A record as it appears in the index file.
#[derive(Debug, Deserialize)]
struct RawMethod {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "return")]
    returns: Vec<String>,
    name: String,
    /// The `p1`, `p2`, ... fields.
    #[serde(flatten)]
    parameters: BTreeMap<String, Parameter>,
}

impl RawMethod {
    fn into_method(self, path: &Path) -> Result<Method> {
        let mut numbered = Vec::with_capacity(self.parameters.len());
        for (key, parameter) in self.parameters {
            let number = key
                .strip_prefix('p')
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| SiteError::Index {
                    path: path.to_path_buf(),
                    message: format!("unexpected field '{}' in function {}", key, self.name),
                })?;
            numbered.push((number, parameter));
        }
        numbered.sort_by_key(|(number, _)| *number);

        Ok(Method {
            name: self.name,
            description: self.description,
            returns: self.returns,
            parameters: numbered.into_iter().map(|(_, p)| p).collect(),
        })
    }
}

/// Functions read back from a generated index, grouped by name.
///
/// A name maps to every signature recorded for it, in document order.
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    path: PathBuf,
    functions: BTreeMap<String, Vec<Method>>,
}

impl FunctionCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }

    /// Parse index content; `path` is only used in error messages.
    pub fn from_json_str(content: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw: Vec<RawMethod> =
            serde_json::from_str(content).map_err(|e| SiteError::Index {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut functions: BTreeMap<String, Vec<Method>> = BTreeMap::new();
        for record in raw {
            let method = record.into_method(path)?;
            functions.entry(method.name.clone()).or_default().push(method);
        }
        tracing::debug!(
            path = %path.display(),
            functions = functions.len(),
            "Loaded function index"
        );

        Ok(Self {
            path: path.to_path_buf(),
            functions,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All signatures for `name`.
    pub fn get(&self, name: &str) -> Option<&[Method]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// Function names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Method])> {
        self.functions
            .iter()
            .map(|(name, methods)| (name.as_str(), methods.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{Ancestors, Engine, MemorySink, NodeList};
    use pretty_assertions::assert_eq;

    fn run(nodes: Vec<Node>) -> String {
        let sink = MemorySink::new("functions.json");
        let mut generators: Vec<Box<dyn Generator>> =
            vec![Box::new(FunctionIndex::with_sink(sink.clone()))];
        Engine::new()
            .run_silent(&mut NodeList::new(nodes), &mut generators)
            .unwrap();
        assert_eq!(sink.close_count(), 1);
        sink.contents()
    }

    /// Nodes for `<refsect1><methodsynopsis>...</methodsynopsis></refsect1>`
    /// with a return type and the given parameters `(type, name, optional)`.
    fn synopsis(name: &str, returns: &[&str], params: &[(&str, &str, bool)]) -> Vec<Node> {
        let refsect1 = Ancestors::root();
        let synopsis = refsect1.push("refsect1");
        let inner = synopsis.push("methodsynopsis");
        let mut nodes = vec![
            Node::opening("refsect1", 0).with_ancestors(refsect1.clone()),
            Node::opening("methodsynopsis", 1).with_ancestors(synopsis.clone()),
        ];

        let type_chain = inner.push("type");
        nodes.push(Node::opening("type", 2).with_ancestors(inner.clone()));
        if returns.len() == 1 {
            nodes.push(Node::text(returns[0], 3).with_ancestors(type_chain.clone()));
        } else {
            let member = type_chain.push("type");
            for ty in returns {
                nodes.push(Node::opening("type", 3).with_ancestors(type_chain.clone()));
                nodes.push(Node::text(*ty, 4).with_ancestors(member.clone()));
                nodes.push(Node::closing("type", 3).with_ancestors(type_chain.clone()));
            }
        }
        nodes.push(Node::closing("type", 2).with_ancestors(inner.clone()));

        let method = inner.push("methodname");
        nodes.push(Node::opening("methodname", 2).with_ancestors(inner.clone()));
        nodes.push(Node::text(name, 3).with_ancestors(method));
        nodes.push(Node::closing("methodname", 2).with_ancestors(inner.clone()));

        for (ty, param, optional) in params {
            let mut open = Node::opening("methodparam", 2).with_ancestors(inner.clone());
            if *optional {
                open = open.with_attribute("choice", "opt");
            }
            let param_chain = inner.push("methodparam");
            nodes.push(open);
            nodes.push(Node::opening("type", 3).with_ancestors(param_chain.clone()));
            nodes.push(Node::text(*ty, 4).with_ancestors(param_chain.push("type")));
            nodes.push(Node::closing("type", 3).with_ancestors(param_chain.clone()));
            nodes.push(Node::opening("parameter", 3).with_ancestors(param_chain.clone()));
            nodes.push(Node::text(*param, 4).with_ancestors(param_chain.push("parameter")));
            nodes.push(Node::closing("parameter", 3).with_ancestors(param_chain.clone()));
            nodes.push(Node::closing("methodparam", 2).with_ancestors(inner.clone()));
        }

        nodes.push(Node::closing("methodsynopsis", 1).with_ancestors(synopsis));
        nodes.push(Node::closing("refsect1", 0).with_ancestors(refsect1));
        nodes
    }

    #[test]
    fn test_single_record() {
        let output = run(synopsis("strlen", &["int"], &[("string", "string", false)]));
        assert_eq!(
            output,
            "[\n{\"description\":null,\"return\":[\"int\"],\"name\":\"strlen\",\"p1\":{\"optional\":false,\"variadic\":false,\"types\":[\"string\"],\"name\":\"string\"}}\n]\n"
        );
    }

    #[test]
    fn test_union_return_is_flattened() {
        let output = run(synopsis(
            "strpos",
            &["int", "false"],
            &[("string", "haystack", false), ("int", "offset", true)],
        ));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let record = &value[0];
        assert_eq!(record["return"], serde_json::json!(["int", "false"]));
        assert_eq!(record["p1"]["name"], "haystack");
        assert_eq!(record["p2"]["optional"], true);
    }

    #[test]
    fn test_records_are_separated() {
        let mut nodes = synopsis("a", &["int"], &[]);
        nodes.extend(synopsis("b", &["void"], &[]));
        let output = run(nodes);
        let value: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(value.len(), 2);
        assert_eq!(value[1]["name"], "b");
    }

    #[test]
    fn test_description_comes_from_refpurpose() {
        let purpose = Ancestors::root().push("refnamediv");
        let mut nodes = vec![
            Node::opening("refnamediv", 0),
            Node::opening("refpurpose", 1).with_ancestors(purpose.clone()),
            Node::text("Get string\n   length", 2).with_ancestors(purpose.push("refpurpose")),
            Node::closing("refpurpose", 1).with_ancestors(purpose),
            Node::closing("refnamediv", 0),
        ];
        nodes.extend(synopsis("strlen", &["int"], &[]));
        nodes.extend(synopsis("alias", &["int"], &[]));

        let value: Vec<serde_json::Value> = serde_json::from_str(&run(nodes)).unwrap();
        assert_eq!(value[0]["description"], "Get string length");
        assert_eq!(value[1]["description"], serde_json::Value::Null);
    }

    #[test]
    fn test_synopsis_outside_refsect1_is_ignored() {
        let nodes = vec![
            Node::opening("methodsynopsis", 0),
            Node::closing("methodsynopsis", 0),
        ];
        assert_eq!(run(nodes), "[\n\n]\n");
    }

    fn run_xml(xml: &str) -> String {
        let sink = MemorySink::new("functions.json");
        let mut generators: Vec<Box<dyn Generator>> =
            vec![Box::new(FunctionIndex::with_sink(sink.clone()))];
        Engine::new()
            .run_silent(&mut lectern_xml::ManualReader::from_str(xml), &mut generators)
            .unwrap();
        sink.contents()
    }

    #[test]
    fn test_initializer_becomes_default() {
        let output = run_xml(
            r#"<refsect1><methodsynopsis><type>int</type><methodname>f</methodname>
<methodparam choice="opt"><type>int</type><parameter>x</parameter><initializer><constant>PHP_INT_MAX</constant></initializer></methodparam>
</methodsynopsis></refsect1>"#,
        );
        let catalog = FunctionCatalog::from_json_str(&output, "functions.json").unwrap();
        assert_eq!(
            catalog.get("f").unwrap()[0].to_string(),
            "f([int $x = PHP_INT_MAX]): int"
        );
    }

    #[test]
    fn test_initializer_outside_refsect1_is_ignored() {
        let output = run_xml(
            r#"<book><classsynopsis><methodsynopsis><type>int</type><methodname>f</methodname>
<methodparam choice="opt"><type>int</type><parameter>x</parameter><initializer>PHP_INT_MAX</initializer></methodparam>
</methodsynopsis></classsynopsis>
<refsect1><para><methodsynopsis><methodname>g</methodname><methodparam><parameter>y</parameter><initializer>1</initializer></methodparam></methodsynopsis></para></refsect1></book>"#,
        );
        assert_eq!(output, "[\n\n]\n");
        let catalog = FunctionCatalog::from_json_str(&output, "functions.json").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_groups_overloads() {
        let content = r#"[
            {"description":"First","return":["int"],"name":"f","p2":{"types":["int"],"name":"b","optional":true},"p1":{"types":["string"],"name":"a"}},
            {"description":null,"name":"f"},
            {"description":null,"return":["void"],"name":"g"}
        ]"#;
        let catalog = FunctionCatalog::from_json_str(content, "functions.json").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["f", "g"]);

        let overloads = catalog.get("f").unwrap();
        assert_eq!(overloads.len(), 2);
        let names: Vec<&str> = overloads[0].parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(overloads[0].to_string(), "f(string $a[, int $b]): int");
        assert_eq!(overloads[1].to_string(), "f()");
    }

    #[test]
    fn test_catalog_rejects_unknown_fields() {
        let err = FunctionCatalog::from_json_str(
            r#"[{"name":"f","extra":{"name":"x"}}]"#,
            "functions.json",
        )
        .unwrap_err();
        assert!(matches!(err, SiteError::Index { .. }));
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn test_parameter_display() {
        let parameter = Parameter {
            name: "values".to_string(),
            types: vec!["mixed".to_string()],
            variadic: true,
            reference: true,
            ..Default::default()
        };
        assert_eq!(parameter.to_string(), "mixed &...$values");
    }
}
