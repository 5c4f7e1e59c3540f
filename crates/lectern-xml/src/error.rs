//! Error types for streaming XML reading.

use lectern_core::RenderError;
use thiserror::Error;

/// Result type alias for lectern-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a document.
#[derive(Error, Debug)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", fmt_position(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// The document ended while elements were still open.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// An end tag does not match the innermost open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}> at byte {position}")]
    MismatchedEndTag {
        expected: String,
        found: String,
        position: u64,
    },

    /// An end tag appeared with no element open.
    #[error("Unexpected closing tag </{found}> at byte {position}")]
    UnexpectedEndTag { found: String, position: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_position(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {}", pos),
        None => String::new(),
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

impl From<Error> for RenderError {
    fn from(err: Error) -> Self {
        RenderError::from_source(err)
    }
}
