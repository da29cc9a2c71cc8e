// ABOUTME: Error types for template engine operations
// ABOUTME: Defines registration, configuration, file and function invocation errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("A variable with the name '{0}' already exists")]
    DuplicateVariable(String),

    #[error("A function with the name '{0}' already exists")]
    DuplicateFunction(String),

    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to decode input as {encoding}: {message}")]
    DecodeError { encoding: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// Error returned by a registered template function.
///
/// The engine hands these back to the caller of `substitute` untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("expected {expected} argument(s), got {actual}")]
    Arity { expected: String, actual: usize },

    #[error("argument {index}: {message}")]
    Argument { index: usize, message: String },

    #[error("{0}")]
    Failed(String),
}

impl InvocationError {
    /// Arity mismatch against an exact or ranged expectation such as `"2"` or `"0..=1"`
    pub fn arity(expected: impl Into<String>, actual: usize) -> Self {
        Self::Arity {
            expected: expected.into(),
            actual,
        }
    }

    pub fn argument(index: usize, message: impl Into<String>) -> Self {
        Self::Argument {
            index,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
