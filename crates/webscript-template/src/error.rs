/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template transpilation.

use thiserror::Error;

/// Errors that can occur while transpiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// A `{` or `@{` whose matching `}` never appears.
    ///
    /// `offset` is the byte offset of the opening delimiter; `line` and
    /// `column` are its 1-based position.
    #[error("unterminated code block at offset {offset}")]
    UnterminatedBlock {
        offset: usize,
        line: usize,
        column: usize,
    },
}

/// Result type for transpiler operations.
pub type TranspileResult<T> = Result<T, TranspileError>;
