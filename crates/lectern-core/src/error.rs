/*
 * error.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! Error types for lectern-core

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a [`DocumentSource`](crate::DocumentSource).
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write to sink {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sink {} is already closed", .0.display())]
    SinkClosed(PathBuf),

    #[error("Generator {0} has no active sink")]
    NoActiveSink(String),

    /// A wrapper was flattened while it still had a slot attached.
    #[error("Unable to render <{tag}> as a string while a slot is attached")]
    SlotAttached { tag: String },

    #[error("Document source error: {0}")]
    Source(#[source] SourceError),

    #[error("Generator {generator} failed: {message}")]
    Generator { generator: String, message: String },
}

impl RenderError {
    /// Create a generator error from any message.
    pub fn generator(generator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generator {
            generator: generator.into(),
            message: message.into(),
        }
    }

    /// Wrap a document source failure.
    pub fn from_source(err: impl Into<SourceError>) -> Self {
        Self::Source(err.into())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
