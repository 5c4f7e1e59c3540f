//! Streaming XML document source for Lectern.
//!
//! This crate wraps [`quick-xml`] to turn a DocBook-style manual into the
//! flat walk of [`lectern_core::Node`]s that the rendering engine consumes.
//! No tree is built: each call to [`ManualReader::next_node`] reads exactly
//! one XML event.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{DocumentSource, NodeKind};
//! use lectern_xml::ManualReader;
//!
//! let mut reader = ManualReader::from_str(r#"<chapter xml:id="intro"><title>Intro</title></chapter>"#);
//!
//! let first = reader.advance().unwrap().unwrap();
//! assert_eq!(first.kind(), NodeKind::OpeningElement);
//! assert_eq!(first.attribute_str("xml:id"), Some("intro"));
//! ```

pub mod error;
pub mod reader;

pub use error::{Error, Result};
pub use reader::ManualReader;
