/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Translation of Lua errors into diagnostics and runtime messages.
//!
//! Lua syntax errors look like `page.wsweb:3: syntax error near 'x'`. They
//! carry a line but no column, so the column is recovered from the token the
//! message names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::result::Diagnostic;

static LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*?:(\d+): (.*)$").expect("valid regex"));
static NEAR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"near '(.*)'$").expect("valid regex"));

const NEAR_EOF: &str = "near <eof>";
const TRACEBACK: &str = "\nstack traceback:";

/// Diagnostics for an error raised while compiling `source`.
///
/// Lines are clamped to the document, so an error reported on the scaffold's
/// closing line points at the end of the last document line.
pub fn compile_diagnostics(err: &mlua::Error, source: &str) -> Vec<Diagnostic> {
    let raw = error_text(err);

    // Lua stops at the first syntax error, so there is at most one.
    match strip_traceback(&raw).lines().find(|line| !line.trim().is_empty()) {
        Some(line) => vec![diagnostic_from_line(line, source)],
        None => vec![Diagnostic::new(1, 1, "compilation failed")],
    }
}

fn diagnostic_from_line(line: &str, source: &str) -> Diagnostic {
    let Some(caps) = LOCATION.captures(line) else {
        return Diagnostic::new(1, 1, line.trim());
    };
    let message = caps[2].trim().to_string();
    let reported: usize = caps[1].parse().unwrap_or(1);

    let doc_lines: Vec<&str> = source.lines().collect();
    let line_count = doc_lines.len().max(1);
    let line_no = reported.clamp(1, line_count);

    let column = if message.ends_with(NEAR_EOF) {
        let last = doc_lines.last().copied().unwrap_or("");
        if reported > line_count || line_no == line_count {
            last.chars().count() + 1
        } else {
            1
        }
    } else if let Some(token) = NEAR_TOKEN.captures(&message) {
        doc_lines
            .get(line_no - 1)
            .and_then(|text| text.find(&token[1]).map(|at| text[..at].chars().count() + 1))
            .unwrap_or(1)
    } else {
        1
    };

    Diagnostic::new(line_no, column, message)
}

/// The message surfaced for an error raised while a document was running.
///
/// Errors raised from host callbacks are unwrapped one level so the message is
/// the callback's own. Lua's stack traceback is dropped.
pub fn runtime_message(err: &mlua::Error) -> String {
    let message = match err {
        mlua::Error::CallbackError { cause, .. } => error_text(cause),
        other => error_text(other),
    };
    strip_traceback(&message).trim_end().to_string()
}

/// The error's message without mlua's `syntax error:`/`runtime error:` prefix.
fn error_text(err: &mlua::Error) -> String {
    match err {
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => message.clone(),
        other => other.to_string(),
    }
}

fn strip_traceback(message: &str) -> &str {
    match message.find(TRACEBACK) {
        Some(at) => &message[..at],
        None => message,
    }
}
