/*
 * error.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! Error types for site generation.

use std::path::PathBuf;

use lectern_core::RenderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Error, Debug)]
pub enum SiteError {
    /// The configuration file could not be parsed.
    #[error("Invalid configuration{}: {message}", fmt_path(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated function index is malformed.
    #[error("Invalid function index {}: {message}", .path.display())]
    Index { path: PathBuf, message: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = SiteError::Config {
            path: Some(PathBuf::from("lectern.toml")),
            message: "unknown field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration in lectern.toml: unknown field"
        );

        let err = SiteError::Config {
            path: None,
            message: "unknown field".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid configuration: unknown field");
    }

    #[test]
    fn test_render_error_is_transparent() {
        let err: SiteError = RenderError::NoActiveSink("pages".to_string()).into();
        assert_eq!(err.to_string(), "Generator pages has no active sink");
    }
}
