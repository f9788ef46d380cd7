// ABOUTME: Evaluator error type and constructors

//! Error model for the evaluator.
//!
//! The core surfaces exactly four error kinds: a type/shape mismatch, a
//! division-by-zero, a file-loader miss, and a catch-all for everything
//! else (unknown callables, plugin failures, allocation failure). Errors
//! are never caught inside the core — they propagate to the caller, which
//! prints them and resumes reading.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("illegal type in {context}: expected {expected}, found {found}")]
    IllegalType {
        context: String,
        expected: String,
        found: String,
    },

    #[error("arithmetic error: {message}")]
    ArithError { message: String },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("unhandled: {message}")]
    Unhandled { message: String },
}

impl EvalError {
    pub fn illegal_type(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        EvalError::IllegalType {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn arith(message: impl Into<String>) -> Self {
        EvalError::ArithError {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        EvalError::FileNotFound { path: path.into() }
    }

    pub fn unhandled(message: impl Into<String>) -> Self {
        EvalError::Unhandled {
            message: message.into(),
        }
    }
}
