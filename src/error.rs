//! Error types for spring-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or rendering a plot.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for framebuffer or plot.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A stat or geom parameter failed validation.
    #[error("`{name}` {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What the value violated.
        reason: &'static str,
    },

    /// A layer lacks aesthetics that its stat or geom requires.
    #[error("{component} requires the following missing aesthetics: {missing}")]
    MissingAesthetics {
        /// Stat or geom name.
        component: String,
        /// Comma-separated aesthetic names.
        missing: String,
    },

    /// An aesthetic refers to a column the data does not have.
    #[error("Aesthetic `{aesthetic}` maps to unknown column `{column}`")]
    UnknownColumn {
        /// Aesthetic name.
        aesthetic: &'static str,
        /// Column name.
        column: String,
    },

    /// Layer index out of range.
    #[error("Layer {index} does not exist (plot has {count} layers)")]
    NoSuchLayer {
        /// Requested index.
        index: usize,
        /// Number of layers.
        count: usize,
    },

    /// Scale domain error (e.g., empty or degenerate domain).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Configuration file could not be read.
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line of the error (0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Unknown theme name.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = Error::InvalidParameter { name: "tension", reason: "must be larger than zero" };
        assert_eq!(err.to_string(), "`tension` must be larger than zero");
    }

    #[test]
    fn test_missing_aesthetics_lists_names() {
        let err = Error::MissingAesthetics {
            component: "stat_spring".into(),
            missing: "xend, yend".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("stat_spring requires"));
        assert!(msg.ends_with("xend, yend"));
    }

    #[test]
    fn test_config_parse_includes_line() {
        let err = Error::ConfigParse { line: 4, message: "bad".into() };
        assert!(err.to_string().contains("line 4"));
    }
}
