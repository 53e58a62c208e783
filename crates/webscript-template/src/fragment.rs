/*
 * fragment.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragments produced by scanning a template.

/// One piece of a scanned template, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// Markup emitted verbatim (already unescaped: `{{` is stored as `{`).
    Literal(String),

    /// Code from a `{ ... }` block, run for its side effects.
    Statement(String),

    /// Code from an `@{ ... }` block whose value is written to the output.
    Expression(String),
}

impl CodeFragment {
    /// The text carried by this fragment, markup or code.
    pub fn text(&self) -> &str {
        match self {
            CodeFragment::Literal(text)
            | CodeFragment::Statement(text)
            | CodeFragment::Expression(text) => text,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, CodeFragment::Literal(_))
    }
}
