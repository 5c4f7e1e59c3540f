//! Event-driven rendering core for Lectern
//!
//! This crate turns a flat stream of document walk events into correctly
//! nested output for several independent generators at once, without walking
//! the source more than once.
//!
//! # Architecture
//!
//! - [`Node`] - One immutable step of the walk (open, close, text, ...)
//! - [`DocumentSource`] - Single-pass producer of nodes
//! - [`Content`] - What a generator renders: text, or a [`Wrapper`] such as
//!   [`Wrap`] or [`HtmlTag`] whose closing half is written later
//! - [`Sink`] - Append-only output target with an explicit close
//! - [`Generator`] - An output producer (set up, render, choose sinks, chunk)
//! - [`Engine`] - Drives the source and reconstructs nesting per generator
//!
//! # Example
//!
//! ```ignore
//! use lectern_core::{Engine, TracingObserver};
//!
//! let mut generators: Vec<Box<dyn Generator>> = vec![Box::new(pages), Box::new(index)];
//! let summary = Engine::new().run(&mut source, &mut generators, &mut TracingObserver::default())?;
//! println!("{} nodes", summary.nodes);
//! ```

pub mod attributes;
pub mod content;
pub mod engine;
pub mod error;
pub mod generator;
pub mod node;
pub mod observer;
pub mod sink;
pub mod source;
pub mod tag;

// Re-export commonly used types
pub use attributes::{AttributeValue, Attributes};
pub use content::{Content, Wrap, Wrapper};
pub use engine::{Engine, RunSummary};
pub use error::{RenderError, Result, SourceError};
pub use generator::Generator;
pub use node::{Ancestors, Node, NodeKind};
pub use observer::{NoopObserver, TickObserver, TracingObserver};
pub use sink::{FileSink, MemorySink, SharedSink, Sink};
pub use source::{DocumentSource, NodeList};
pub use tag::{HtmlTag, VOID_TAGS, escape_html};
