//! Website generators for Lectern.
//!
//! Two generators share one pass over a manual:
//!
//! - [`PageGenerator`] writes the HTML pages, one file per chunk element
//! - [`FunctionIndex`] writes `functions.json`, a data file describing every
//!   function synopsis, which [`FunctionCatalog`] reads back
//!
//! Both take a [`SiteConfig`] explicitly.
//!
//! # Example
//!
//! ```ignore
//! use lectern_core::{Engine, Generator, TracingObserver};
//! use lectern_site::{FunctionIndex, PageGenerator, SiteConfig};
//! use lectern_xml::ManualReader;
//!
//! let config = SiteConfig::load("lectern.toml")?;
//! let mut generators: Vec<Box<dyn Generator>> = vec![
//!     Box::new(PageGenerator::new(&config)),
//!     Box::new(FunctionIndex::create(&config)?),
//! ];
//! let mut reader = ManualReader::from_path("manual.xml")?;
//! Engine::new().run(&mut reader, &mut generators, &mut TracingObserver::new(config.progress_interval))?;
//! ```

pub mod config;
pub mod error;
pub mod functions;
pub mod pages;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use functions::{FunctionCatalog, FunctionIndex, Method, Parameter};
pub use pages::{PageGenerator, PageLog};
