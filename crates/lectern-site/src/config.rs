/*
 * config.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Site build configuration.
 */

//! Site configuration.
//!
//! A [`SiteConfig`] is built once (from defaults, a TOML file, and command
//! line overrides) and handed to every generator that needs it.
//!
//! ```toml
//! language = "en"
//! build_directory = "build/output"
//! index_directory = "build/indexes"
//! chunk_elements = ["book", "chapter", "refentry"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Language code; pages and indexes are written per language.
    pub language: String,

    /// Where HTML pages are written.
    pub build_directory: PathBuf,

    /// Where data indexes (such as `functions.json`) are written.
    pub index_directory: PathBuf,

    pub debug: bool,

    /// Element names that start a new page when they carry an id.
    pub chunk_elements: Vec<String>,

    /// Log a progress line every this many nodes.
    pub progress_interval: usize,

    /// Write buffer size for file sinks, in bytes.
    pub sink_buffer_size: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            build_directory: PathBuf::from("build/output"),
            index_directory: PathBuf::from("build/indexes"),
            debug: false,
            chunk_elements: ["book", "preface", "chapter", "appendix", "reference", "refentry"]
                .into_iter()
                .map(String::from)
                .collect(),
            progress_interval: 1000,
            sink_buffer_size: 8 * 1024,
        }
    }
}

impl SiteConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SiteError::Config {
            path: None,
            message: e.message().to_string(),
        })
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|err| match err {
            SiteError::Config { message, .. } => SiteError::Config {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), language = %config.language, "Loaded site config");
        Ok(config)
    }

    /// Directory holding the HTML pages for the configured language.
    pub fn page_directory(&self) -> PathBuf {
        self.build_directory.join(&self.language)
    }

    /// Path of the generated function index for the configured language.
    pub fn function_index_path(&self) -> PathBuf {
        self.index_directory
            .join("website")
            .join(&self.language)
            .join("functions.json")
    }

    pub fn is_chunk_element(&self, name: &str) -> bool {
        self.chunk_elements.iter().any(|element| element == name)
    }
}
