/*
 * result.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Execution outcomes and the HTML error document.

use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

use webscript_template::TranspileError;

use crate::error::{CompileFailure, RuntimeFailure};
use crate::html::escape_html;

/// A compiler diagnostic, positioned in the document that was compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The outcome of executing one document.
///
/// Every failure is reported as data; nothing here is an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptResult {
    /// Everything the document wrote to its output sink.
    Success(String),
    CompileFailure(Vec<Diagnostic>),
    RuntimeFailure(String),
    /// A template with an unterminated code block.
    MalformedDocument {
        offset: usize,
        line: usize,
        column: usize,
    },
    /// The document could not be read.
    DocumentUnavailable { path: PathBuf, message: String },
}

/// What a front end sends back: the body and whether it is an error document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub error: bool,
    pub body: String,
}

impl ScriptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ScriptResult::Success(_))
    }

    /// The produced output, if execution succeeded.
    pub fn output(&self) -> Option<&str> {
        match self {
            ScriptResult::Success(output) => Some(output),
            _ => None,
        }
    }

    /// Render the error document for a failed result.
    ///
    /// Returns `None` for [`ScriptResult::Success`]. All interpolated text is
    /// HTML-escaped.
    pub fn to_html(&self) -> Option<String> {
        let mut body = String::from("<html><body>");
        match self {
            ScriptResult::Success(_) => return None,
            ScriptResult::CompileFailure(diagnostics) => {
                body.push_str("<h1>Script Compilation Errors</h1>");
                body.push_str(
                    "<p>The following errors occurred processing the requested resource</p>",
                );
                body.push_str("<ul>");
                for d in diagnostics {
                    let _ = write!(
                        body,
                        "<li>{}:{} — {}</li>",
                        d.line,
                        d.column,
                        escape_html(&d.message)
                    );
                }
                body.push_str("</ul>");
            }
            ScriptResult::RuntimeFailure(message) => {
                body.push_str("<h1>Runtime Error</h1>");
                let _ = write!(
                    body,
                    "<p>The following runtime error occurred: {}</p>",
                    escape_html(message)
                );
            }
            ScriptResult::MalformedDocument {
                offset,
                line,
                column,
            } => {
                body.push_str("<h1>Malformed Document</h1>");
                let _ = write!(
                    body,
                    "<p>Unterminated code block at offset {offset} (line {line}, column {column})</p>"
                );
            }
            ScriptResult::DocumentUnavailable { path, message } => {
                body.push_str("<h1>Document Not Found</h1>");
                let _ = write!(
                    body,
                    "<p>{}: {}</p>",
                    escape_html(&path.display().to_string()),
                    escape_html(message)
                );
            }
        }
        body.push_str("</body></html>");
        Some(body)
    }

    /// Convert into the `(error, body)` pair a front end responds with.
    pub fn into_response(self) -> Response {
        match self {
            ScriptResult::Success(body) => Response { error: false, body },
            failed => Response {
                error: true,
                body: failed.to_html().unwrap_or_default(),
            },
        }
    }
}

impl From<TranspileError> for ScriptResult {
    fn from(err: TranspileError) -> Self {
        match err {
            TranspileError::UnterminatedBlock {
                offset,
                line,
                column,
            } => ScriptResult::MalformedDocument {
                offset,
                line,
                column,
            },
        }
    }
}

impl From<CompileFailure> for ScriptResult {
    fn from(failure: CompileFailure) -> Self {
        ScriptResult::CompileFailure(failure.diagnostics)
    }
}

impl From<RuntimeFailure> for ScriptResult {
    fn from(failure: RuntimeFailure) -> Self {
        ScriptResult::RuntimeFailure(failure.message)
    }
}
