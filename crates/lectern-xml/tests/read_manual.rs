//! Reading manuals from disk and feeding them to the engine.

use std::io::Write;

use lectern_core::{
    Content, Engine, Generator, HtmlTag, MemorySink, Node, Result, Sink, escape_html,
};
use lectern_xml::ManualReader;
use pretty_assertions::assert_eq;

const MANUAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE book>
<book xml:id="manual">
  <chapter xml:id="intro">
    <title>Introduction</title>
    <para>Use <function>strlen</function> &amp; friends.</para>
  </chapter>
</book>
"#;

/// Renders para and function as HTML and drops everything else.
struct Fragments {
    sink: MemorySink,
}

impl Generator for Fragments {
    fn name(&self) -> &str {
        "fragments"
    }

    fn stream(&mut self, _node: &Node) -> Result<Box<dyn Sink>> {
        Ok(Box::new(self.sink.clone()))
    }

    fn render(&mut self, node: &Node) -> Result<Content> {
        if node.is_opening_element() {
            return Ok(match node.name() {
                "para" => HtmlTag::new("p").into(),
                "function" => HtmlTag::new("code").into(),
                _ => Content::empty(),
            });
        }
        if node.is_text_content() && node.within("para") {
            return Ok(escape_html(node.value()).into());
        }
        Ok(Content::empty())
    }
}

#[test]
fn reads_manual_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MANUAL.as_bytes()).unwrap();

    let nodes = ManualReader::from_path(file.path())
        .unwrap()
        .collect_nodes()
        .unwrap();

    let elements: Vec<(&str, usize)> = nodes
        .iter()
        .filter(|n| n.is_opening_element())
        .map(|n| (n.name(), n.depth()))
        .collect();
    assert_eq!(
        elements,
        vec![
            ("book", 0),
            ("chapter", 1),
            ("title", 2),
            ("para", 2),
            ("function", 3),
        ]
    );

    let chapter = nodes
        .iter()
        .find(|n| n.is_opening_element() && n.name() == "chapter")
        .unwrap();
    assert_eq!(chapter.attribute_str("xml:id"), Some("intro"));
    assert!(chapter.parent("book"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ManualReader::from_path(dir.path().join("missing.xml"));
    assert!(matches!(result, Err(lectern_xml::Error::Io(_))));
}

#[test]
fn engine_renders_reader_output() {
    let sink = MemorySink::new("fragments.html");
    let mut generators: Vec<Box<dyn Generator>> = vec![Box::new(Fragments { sink: sink.clone() })];
    let mut reader = ManualReader::from_str(MANUAL);

    let summary = Engine::new().run_silent(&mut reader, &mut generators).unwrap();

    assert_eq!(sink.contents(), "<p>Use <code>strlen</code> &amp; friends.</p>");
    assert_eq!(summary.sinks, vec![1]);
}

#[test]
fn syntax_error_surfaces_from_engine() {
    let sink = MemorySink::new("fragments.html");
    let mut generators: Vec<Box<dyn Generator>> = vec![Box::new(Fragments { sink: sink.clone() })];
    let mut reader = ManualReader::from_str("<book><para>x</book>");

    let err = Engine::new()
        .run_silent(&mut reader, &mut generators)
        .unwrap_err();

    assert!(err.to_string().contains("</para>"));
    assert!(sink.is_closed());
}
