/*
 * pages.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * HTML website generator.
 */

//! The HTML page generator.
//!
//! Output starts in `index.html`. Every chunk element (see
//! [`SiteConfig::chunk_elements`]) below the document root that carries an
//! id moves output to its own page, `<build>/<language>/<id>.html`. Pages
//! are wrapped in a full HTML document shell; DocBook elements map to HTML
//! tags and elements without a mapping render nothing.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lectern_core::{
    Content, FileSink, Generator, HtmlTag, Node, RenderError, Result, Sink, Wrap, escape_html,
};

use crate::config::SiteConfig;

const SECTION_ELEMENTS: &[&str] = &[
    "section",
    "sect1",
    "sect2",
    "sect3",
    "refsect1",
    "refsect2",
    "refsect3",
    "refsynopsisdiv",
    "refnamediv",
];

const CODE_ELEMENTS: &[&str] = &[
    "literal",
    "function",
    "parameter",
    "type",
    "constant",
    "varname",
    "classname",
    "filename",
];

/// Record of the pages a [`PageGenerator`] has opened.
///
/// Clones share the same list, so the caller can keep one while the
/// generator is owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct PageLog {
    paths: Rc<RefCell<Vec<PathBuf>>>,
}

impl PageLog {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.paths.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.borrow().is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.borrow().iter().any(|written| written == path)
    }

    fn record(&self, path: PathBuf) {
        self.paths.borrow_mut().push(path);
    }
}

pub struct PageGenerator {
    config: SiteConfig,
    log: PageLog,
}

impl PageGenerator {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            config: config.clone(),
            log: PageLog::default(),
        }
    }

    /// A handle to the list of pages written so far.
    pub fn page_log(&self) -> PageLog {
        self.log.clone()
    }

    /// Whether `node` is rendered as a complete HTML document.
    ///
    /// The document root always is, when it is a chunk element; deeper chunk
    /// elements only when they have an id to name their page after.
    fn starts_page(&self, node: &Node) -> bool {
        node.is_opening_element()
            && self.config.is_chunk_element(node.name())
            && (node.depth() == 0 || element_id(node).is_some())
    }

    fn page_path(&self, node: &Node) -> Result<PathBuf> {
        let file = match element_id(node) {
            Some(id) if node.depth() > 0 && self.starts_page(node) => {
                if id.contains(['/', '\\']) || id.starts_with('.') {
                    return Err(RenderError::generator(
                        "pages",
                        format!("id '{}' cannot be used as a page name", id),
                    ));
                }
                format!("{}.html", id)
            }
            _ => "index.html".to_string(),
        };
        Ok(self.config.page_directory().join(file))
    }

    fn page_shell(&self, node: &Node) -> Content {
        let mut article = HtmlTag::new("article").with_attribute("class", node.name());
        if let Some(id) = element_id(node) {
            article = article.with_attribute("id", id);
        }
        let html = HtmlTag::new("html")
            .with_attribute("lang", self.config.language.as_str())
            .with_before("<head><meta charset=\"utf-8\"></head><body>")
            .with_after("</body>")
            .wrap_slot(article);
        Wrap::new("<!DOCTYPE html>\n", "\n").wrap_slot(html).into()
    }

    fn render_element(&self, node: &Node) -> Content {
        if self.starts_page(node) {
            return self.page_shell(node);
        }

        let name = node.name();
        let tag = match name {
            "para" | "simpara" => HtmlTag::new("p"),
            "emphasis" => match node.attribute_str("role") {
                Some("bold" | "strong") => HtmlTag::new("strong"),
                _ => HtmlTag::new("em"),
            },
            _ if CODE_ELEMENTS.contains(&name) => {
                HtmlTag::new("code").with_attribute("class", name)
            }
            "programlisting" | "screen" => {
                let mut code = HtmlTag::new("code");
                if let Some(language) = node.attribute_str("language") {
                    code = code.with_attribute("class", format!("language-{}", language));
                }
                HtmlTag::new("pre")
                    .with_attribute("class", name)
                    .wrap_slot(code)
            }
            "itemizedlist" => HtmlTag::new("ul"),
            "orderedlist" => HtmlTag::new("ol"),
            "listitem" if node.parent("varlistentry") => HtmlTag::new("dd"),
            "listitem" => HtmlTag::new("li"),
            "variablelist" => HtmlTag::new("dl"),
            "term" => HtmlTag::new("dt"),
            "link" => link(node),
            "xref" => {
                let target = node.attribute_str("linkend").unwrap_or_default();
                link(node).with_before(escape_html(target))
            }
            "note" | "warning" | "tip" | "caution" | "important" => admonition(name),
            _ if SECTION_ELEMENTS.contains(&name) || self.config.is_chunk_element(name) => {
                let mut section = HtmlTag::new("section").with_attribute("class", name);
                if let Some(id) = element_id(node) {
                    section = section.with_attribute("id", id);
                }
                section
            }
            "table" | "informaltable" => HtmlTag::new("table"),
            "thead" | "tbody" | "tfoot" => HtmlTag::new(name),
            "row" => HtmlTag::new("tr"),
            "entry" if node.within("thead") => HtmlTag::new("th"),
            "entry" => HtmlTag::new("td"),
            "title" => HtmlTag::new("h2"),
            "refname" => HtmlTag::new("h1"),
            "refpurpose" => HtmlTag::new("p").with_attribute("class", "refpurpose"),
            "mediaobject" => HtmlTag::new("figure"),
            "imagedata" => {
                let mut img = HtmlTag::new("img");
                if let Some(src) = node.attribute_str("fileref") {
                    img = img.with_attribute("src", src);
                }
                img
            }
            "methodsynopsis" => HtmlTag::new("div").with_attribute("class", name),
            "methodname" | "methodparam" | "modifier" | "initializer" => {
                let mut span = HtmlTag::new("span").with_attribute("class", name);
                if node.attribute_str("choice") == Some("opt") {
                    span = span.with_attribute("class", "optional");
                }
                span
            }
            _ => return Content::empty(),
        };
        tag.into()
    }
}

impl Generator for PageGenerator {
    fn name(&self) -> &str {
        "pages"
    }

    fn stream(&mut self, node: &Node) -> Result<Box<dyn Sink>> {
        let path = self.page_path(node)?;
        if self.log.contains(&path) {
            tracing::warn!(path = %path.display(), "Page written twice");
            return Err(RenderError::generator(
                "pages",
                format!("page {} was already written", path.display()),
            ));
        }
        tracing::debug!(path = %path.display(), "Starting page");
        let sink = FileSink::with_capacity(&path, self.config.sink_buffer_size)?;
        self.log.record(path);
        Ok(Box::new(sink))
    }

    fn should_chunk(&mut self, node: &Node) -> bool {
        node.depth() > 0 && self.starts_page(node)
    }

    fn render(&mut self, node: &Node) -> Result<Content> {
        let content = if node.is_opening_element() {
            self.render_element(node)
        } else if node.is_text_content() || node.is_cdata() {
            escape_html(node.value()).into()
        } else {
            Content::empty()
        };
        Ok(content)
    }
}

fn element_id(node: &Node) -> Option<&str> {
    node.attribute_str("xml:id")
        .or_else(|| node.attribute_str("id"))
        .filter(|id| !id.is_empty())
}

fn link(node: &Node) -> HtmlTag {
    let href = match (node.attribute_str("linkend"), node.attribute_str("xlink:href")) {
        (Some(linkend), _) => format!("{}.html", linkend),
        (None, Some(href)) => href.to_string(),
        (None, None) => return HtmlTag::new("a"),
    };
    HtmlTag::new("a").with_attribute("href", href)
}

fn admonition(kind: &str) -> HtmlTag {
    let label = match kind {
        "note" => "Note",
        "warning" => "Warning",
        "tip" => "Tip",
        "caution" => "Caution",
        _ => "Important",
    };
    HtmlTag::new("div")
        .with_attribute("class", vec!["admonition", kind])
        .with_before(format!("<p class=\"admonition-title\">{}</p>", label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{Ancestors, Wrapper};
    use pretty_assertions::assert_eq;

    fn generator() -> PageGenerator {
        PageGenerator::new(&SiteConfig::default())
    }

    fn open(node: &Node) -> (String, String) {
        match generator().render_element(node) {
            Content::Wrapper(wrapper) => (wrapper.before(), wrapper.after()),
            Content::Text(text) => (text, String::new()),
        }
    }

    #[test]
    fn test_simple_mappings() {
        assert_eq!(
            open(&Node::opening("para", 2)),
            ("<p>".to_string(), "</p>".to_string())
        );
        assert_eq!(
            open(&Node::opening("emphasis", 3).with_attribute("role", "bold")).0,
            "<strong>"
        );
        assert_eq!(
            open(&Node::opening("function", 3)).0,
            "<code class=\"function\">"
        );
        assert_eq!(open(&Node::opening("refpurpose", 3)).0, "<p class=\"refpurpose\">");
    }

    #[test]
    fn test_unmapped_element_renders_nothing() {
        assert_eq!(open(&Node::opening("info", 1)), (String::new(), String::new()));
    }

    #[test]
    fn test_programlisting_has_code_slot() {
        let node = Node::opening("programlisting", 2).with_attribute("language", "php");
        insta::assert_snapshot!(open(&node).0, @r#"<pre class="programlisting"><code class="language-php">"#);
        assert_eq!(open(&node).1, "</code></pre>");
    }

    #[test]
    fn test_listitem_depends_on_parent() {
        let in_list =
            Node::opening("listitem", 3).with_ancestors(Ancestors::from_path("itemizedlist"));
        let in_entry = Node::opening("listitem", 3)
            .with_ancestors(Ancestors::from_path("varlistentry.variablelist"));
        assert_eq!(open(&in_list).0, "<li>");
        assert_eq!(open(&in_entry).0, "<dd>");
    }

    #[test]
    fn test_links() {
        let xref = Node::opening("xref", 3)
            .self_closing()
            .with_attribute("linkend", "function.strlen");
        assert_eq!(
            open(&xref),
            (
                "<a href=\"function.strlen.html\">function.strlen".to_string(),
                "</a>".to_string()
            )
        );
        let external =
            Node::opening("link", 3).with_attribute("xlink:href", "https://example.org/?a&b");
        assert_eq!(open(&external).0, "<a href=\"https://example.org/?a&amp;b\">");
    }

    #[test]
    fn test_admonition() {
        let (before, after) = open(&Node::opening("warning", 2));
        assert_eq!(
            before,
            "<div class=\"admonition warning\"><p class=\"admonition-title\">Warning</p>"
        );
        assert_eq!(after, "</div>");
    }

    #[test]
    fn test_imagedata_is_void() {
        let node = Node::opening("imagedata", 4)
            .self_closing()
            .with_attribute("fileref", "figures/a.png");
        assert_eq!(
            open(&node),
            ("<img src=\"figures/a.png\">".to_string(), String::new())
        );
    }

    #[test]
    fn test_page_shell_and_paths() {
        let config = SiteConfig::default();
        let pages = PageGenerator::new(&config);

        let root = Node::opening("book", 0).with_attribute("xml:id", "manual");
        let chapter = Node::opening("chapter", 1).with_attribute("xml:id", "intro");
        let anonymous = Node::opening("chapter", 1);

        assert!(pages.starts_page(&root));
        assert!(pages.starts_page(&chapter));
        assert!(!pages.starts_page(&anonymous));

        assert_eq!(
            pages.page_path(&root).unwrap(),
            config.page_directory().join("index.html")
        );
        assert_eq!(
            pages.page_path(&chapter).unwrap(),
            config.page_directory().join("intro.html")
        );

        let (before, after) = open(&chapter);
        assert_eq!(
            before,
            "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"></head><body><article class=\"chapter\" id=\"intro\">"
        );
        assert_eq!(after, "</article></body></html>\n");
        assert_eq!(open(&anonymous).0, "<section class=\"chapter\">");
    }

    #[test]
    fn test_page_id_must_be_a_file_name() {
        let pages = generator();
        let node = Node::opening("chapter", 1).with_attribute("xml:id", "../escape");
        let err = pages.page_path(&node).unwrap_err();
        assert!(matches!(err, RenderError::Generator { .. }));
    }

    #[test]
    fn test_duplicate_page_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            build_directory: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let mut pages = PageGenerator::new(&config);
        let chapter = Node::opening("chapter", 1).with_attribute("xml:id", "intro");

        let mut first = pages.stream(&chapter).unwrap();
        first.write("first").unwrap();
        first.close().unwrap();

        let err = pages.stream(&chapter).err().unwrap();
        assert!(matches!(err, RenderError::Generator { .. }));
        assert_eq!(pages.page_log().len(), 1);
        let written = std::fs::read_to_string(config.page_directory().join("intro.html")).unwrap();
        assert_eq!(written, "first");
    }

    #[test]
    fn test_chunks_only_below_root() {
        let mut pages = generator();
        let root = Node::opening("book", 0).with_attribute("xml:id", "manual");
        let chapter = Node::opening("chapter", 1).with_attribute("xml:id", "intro");
        assert!(!pages.should_chunk(&root));
        assert!(pages.should_chunk(&chapter));
        assert!(!pages.should_chunk(&Node::opening("para", 2)));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut pages = generator();
        let content = pages.render(&Node::text("a < b & c", 2)).unwrap();
        assert!(matches!(content, Content::Text(text) if text == "a &lt; b &amp; c"));
        let content = pages.render(&Node::comment("skip", 2)).unwrap();
        assert!(content.is_empty());
    }
}
