/*
 * engine.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Drives a document walk through every generator.
 */

//! The run driver.
//!
//! [`Engine::run`] pulls nodes from a [`DocumentSource`] exactly once and
//! dispatches each node to every [`Generator`] in registration order. For each
//! generator the engine owns a run state holding:
//!
//! - the active [`Sink`], acquired through `stream` on the first dispatched
//!   node and again on every chunk boundary;
//! - a LIFO stack of pending closers: the `after` halves of wrappers, each
//!   tagged with the name and depth of the opening element that produced it.
//!
//! A closing element pops the top closer only when its name and depth match
//! the opening element that pushed it; otherwise it writes nothing. A chunk
//! boundary writes *every* pending closer before the sink is closed, including
//! closers of elements that are still open in the source document. End of run
//! does the same for each generator before `tear_down`.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{
//!     Content, Engine, Generator, HtmlTag, MemorySink, Node, NodeList, Result, Sink,
//! };
//!
//! struct Echo(MemorySink);
//!
//! impl Generator for Echo {
//!     fn name(&self) -> &str { "echo" }
//!
//!     fn stream(&mut self, _node: &Node) -> Result<Box<dyn Sink>> {
//!         Ok(Box::new(self.0.clone()))
//!     }
//!
//!     fn render(&mut self, node: &Node) -> Result<Content> {
//!         if node.is_opening_element() {
//!             Ok(HtmlTag::new(node.name()).into())
//!         } else {
//!             Ok(node.value().into())
//!         }
//!     }
//! }
//!
//! let sink = MemorySink::new("out.html");
//! let mut generators: Vec<Box<dyn Generator>> = vec![Box::new(Echo(sink.clone()))];
//! let mut source = NodeList::new(vec![
//!     Node::opening("div", 0),
//!     Node::text("hi", 1),
//!     Node::closing("div", 0),
//! ]);
//!
//! Engine::new().run_silent(&mut source, &mut generators)?;
//! assert_eq!(sink.contents(), "<div>hi</div>");
//! # Ok::<(), lectern_core::RenderError>(())
//! ```

use crate::content::Content;
use crate::error::{RenderError, Result};
use crate::generator::Generator;
use crate::node::{Node, NodeKind};
use crate::observer::{NoopObserver, TickObserver};
use crate::sink::Sink;
use crate::source::DocumentSource;

/// Statistics about a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Nodes dispatched to generators (doctype nodes are not counted).
    pub nodes: usize,
    /// Sinks acquired per generator, in registration order.
    pub sinks: Vec<usize>,
}

/// The `after` half of a wrapper, waiting for its closing element.
#[derive(Debug)]
struct PendingCloser {
    content: String,
    name: String,
    depth: usize,
}

impl PendingCloser {
    fn matches(&self, node: &Node) -> bool {
        self.name == node.name() && self.depth == node.depth()
    }
}

/// Run state for one generator, owned by the engine for one run.
struct GeneratorState {
    generator: String,
    sink: Option<Box<dyn Sink>>,
    closers: Vec<PendingCloser>,
    sinks_opened: usize,
}

impl GeneratorState {
    fn new(generator: &dyn Generator) -> Self {
        Self {
            generator: generator.name().to_string(),
            sink: None,
            closers: Vec::new(),
            sinks_opened: 0,
        }
    }

    fn open(&mut self, generator: &mut dyn Generator, node: &Node) -> Result<()> {
        let sink = generator.stream(node)?;
        tracing::debug!(
            generator = %self.generator,
            path = %sink.path().display(),
            "Acquired sink"
        );
        self.sink = Some(sink);
        self.sinks_opened += 1;
        Ok(())
    }

    fn close_sink(&mut self) -> Result<()> {
        match self.sink.take() {
            Some(mut sink) => sink.close(),
            None => Ok(()),
        }
    }

    fn write(&mut self, content: Content, node: &Node) -> Result<()> {
        match content {
            Content::Text(text) => self.write_text(&text),
            Content::Wrapper(wrapper) => {
                self.write_text(&wrapper.before())?;
                if node.is_self_closing() {
                    self.write_text(&wrapper.after())
                } else {
                    self.closers.push(PendingCloser {
                        content: wrapper.after(),
                        name: node.name().to_string(),
                        depth: node.depth(),
                    });
                    Ok(())
                }
            }
        }
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self.sink.as_mut() {
            Some(sink) => sink.write(text),
            None => Err(RenderError::NoActiveSink(self.generator.clone())),
        }
    }

    fn close_element(&mut self, node: &Node) -> Result<()> {
        let matched = self.closers.last().is_some_and(|closer| closer.matches(node));
        if !matched {
            tracing::trace!(
                generator = %self.generator,
                element = node.name(),
                depth = node.depth(),
                "No pending closer for closing element"
            );
            return Ok(());
        }
        self.write_next_closer()
    }

    fn write_next_closer(&mut self) -> Result<()> {
        match self.closers.pop() {
            Some(closer) => self.write_text(&closer.content),
            None => Ok(()),
        }
    }

    fn write_pending_closers(&mut self) -> Result<()> {
        while !self.closers.is_empty() {
            self.write_next_closer()?;
        }
        Ok(())
    }
}

/// Drives a document source through a set of generators.
///
/// The engine keeps no state between runs, so one instance can be reused.
#[derive(Default)]
pub struct Engine {
    states: Vec<GeneratorState>,
}

impl Engine {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Run without an observer.
    pub fn run_silent<S>(
        &mut self,
        source: &mut S,
        generators: &mut [Box<dyn Generator>],
    ) -> Result<RunSummary>
    where
        S: DocumentSource + ?Sized,
    {
        self.run(source, generators, &mut NoopObserver)
    }

    /// Walk `source` once, dispatching every node to every generator.
    ///
    /// # Errors
    ///
    /// Any error from the source, a generator, or a sink aborts the whole run.
    /// Sinks still open at that point are closed on a best-effort basis and
    /// their output is left partially written.
    pub fn run<S, O>(
        &mut self,
        source: &mut S,
        generators: &mut [Box<dyn Generator>],
        observer: &mut O,
    ) -> Result<RunSummary>
    where
        S: DocumentSource + ?Sized,
        O: TickObserver + ?Sized,
    {
        self.states = generators
            .iter()
            .map(|generator| GeneratorState::new(generator.as_ref()))
            .collect();

        tracing::debug!(generators = generators.len(), "Starting run");

        let summary = match self.execute(source, generators, observer) {
            Ok(nodes) => {
                let summary = RunSummary {
                    nodes,
                    sinks: self.states.iter().map(|s| s.sinks_opened).collect(),
                };
                tracing::debug!(nodes = summary.nodes, "Run complete");
                Ok(summary)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Run aborted");
                self.abandon();
                Err(err)
            }
        };

        self.states.clear();
        summary
    }

    fn execute<S, O>(
        &mut self,
        source: &mut S,
        generators: &mut [Box<dyn Generator>],
        observer: &mut O,
    ) -> Result<usize>
    where
        S: DocumentSource + ?Sized,
        O: TickObserver + ?Sized,
    {
        self.set_up(generators)?;
        let nodes = self.drive(source, generators, observer)?;
        self.finish(generators)?;
        Ok(nodes)
    }

    fn set_up(&mut self, generators: &mut [Box<dyn Generator>]) -> Result<()> {
        for generator in generators.iter_mut() {
            generator.set_up()?;
        }
        Ok(())
    }

    fn drive<S, O>(
        &mut self,
        source: &mut S,
        generators: &mut [Box<dyn Generator>],
        observer: &mut O,
    ) -> Result<usize>
    where
        S: DocumentSource + ?Sized,
        O: TickObserver + ?Sized,
    {
        let mut tick = 0;

        while let Some(node) = source.advance()? {
            if node.is_doctype() {
                continue;
            }

            observer.on_tick(&node, tick);
            let first = tick == 0;
            tick += 1;

            for (generator, state) in generators.iter_mut().zip(self.states.iter_mut()) {
                if first {
                    state.open(generator.as_mut(), &node)?;
                }
                dispatch(generator.as_mut(), state, &node)?;
            }
        }

        Ok(tick)
    }

    fn finish(&mut self, generators: &mut [Box<dyn Generator>]) -> Result<()> {
        for (generator, state) in generators.iter_mut().zip(self.states.iter_mut()) {
            state.write_pending_closers()?;
            generator.tear_down()?;
            state.close_sink()?;
        }
        Ok(())
    }

    /// Close whatever is still open after a fatal error.
    fn abandon(&mut self) {
        for state in &mut self.states {
            if let Err(err) = state.close_sink() {
                tracing::warn!(
                    generator = %state.generator,
                    error = %err,
                    "Failed to close sink after aborted run"
                );
            }
        }
    }
}

fn dispatch(generator: &mut dyn Generator, state: &mut GeneratorState, node: &Node) -> Result<()> {
    match node.kind() {
        NodeKind::OpeningElement => {
            if generator.should_chunk(node) {
                state.write_pending_closers()?;
                state.close_sink()?;
                state.open(generator, node)?;
                tracing::debug!(
                    generator = %state.generator,
                    element = node.name(),
                    chunk = state.sinks_opened,
                    "Started new chunk"
                );
            }
            let content = generator.render(node)?;
            state.write(content, node)
        }
        NodeKind::ClosingElement => state.close_element(node),
        NodeKind::Text | NodeKind::CData | NodeKind::ProcessingInstruction => {
            let content = generator.render(node)?;
            state.write(content, node)
        }
        NodeKind::Whitespace | NodeKind::Comment => Ok(()),
        // Filtered out before dispatch
        NodeKind::Doctype => Ok(()),
    }
}
