/*
 * lower.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lowering of scanned fragments into a plain script.
//!
//! Every lowered fragment is terminated with `;`, which Lua accepts as an
//! empty statement. This keeps a fragment from being read as a call on the
//! previous one and lets a statement block open a construct (`for ... do`)
//! that a later block closes (`end`).
//!
//! The generated script has the same line structure as the template: code is
//! copied verbatim and a literal is written one source line at a time, with a
//! real newline following each `\n` escape.
//!
//! Code whose last line holds a `--` comment is followed by a newline so the
//! comment can't swallow the `)` or `;` after it. The next newline in literal
//! text is then written without its real newline, which brings the line
//! structure back in step.
//!
//! A statement block starting with `return` is lowered to `do return ... end`,
//! since Lua only accepts `return` as the last statement of a block.

use crate::SINK_NAME;
use crate::fragment::CodeFragment;

/// Lower fragments to script source.
pub fn lower(fragments: &[CodeFragment]) -> String {
    let mut lowering = Lowering::default();
    for fragment in fragments {
        match fragment {
            CodeFragment::Literal(text) => lowering.literal(text),
            CodeFragment::Statement(code) => lowering.statement(code),
            CodeFragment::Expression(code) => lowering.expression(code),
        }
    }
    lowering.out
}

#[derive(Default)]
struct Lowering {
    out: String,
    /// Newlines emitted after code that literal text has yet to make up for.
    owed_newlines: usize,
}

impl Lowering {
    fn literal(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            let mut quoted = String::with_capacity(piece.len() + 2);
            quoted.push('"');
            escape_lua_string(piece, &mut quoted);
            quoted.push('"');
            self.write_call(&quoted);
            if piece.ends_with('\n') {
                if self.owed_newlines > 0 {
                    self.owed_newlines -= 1;
                } else {
                    self.out.push('\n');
                }
            }
        }
    }

    fn statement(&mut self, code: &str) {
        if starts_with_return(code) {
            self.out.push_str("do ");
            self.code(code);
            self.out.push_str(" end");
        } else {
            self.code(code);
        }
        self.out.push(';');
    }

    fn expression(&mut self, code: &str) {
        self.out.push_str(SINK_NAME);
        self.out.push_str(".Write(");
        self.code(code);
        self.out.push_str(");");
    }

    fn code(&mut self, code: &str) {
        self.out.push_str(code);
        if ends_in_line_comment(code) {
            self.out.push('\n');
            self.owed_newlines += 1;
        }
    }

    fn write_call(&mut self, argument: &str) {
        self.out.push_str(SINK_NAME);
        self.out.push_str(".Write(");
        self.out.push_str(argument);
        self.out.push_str(");");
    }
}

/// Whether the last line of `code` contains `--`. A `--` inside a string
/// literal also counts; the extra newline is harmless there.
fn ends_in_line_comment(code: &str) -> bool {
    code.rsplit('\n').next().is_some_and(|last| last.contains("--"))
}

fn starts_with_return(code: &str) -> bool {
    code.trim_start()
        .strip_prefix("return")
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Append `text` to `out` escaped for use inside a double-quoted Lua string.
///
/// Control characters without a short escape use the three digit decimal form
/// so a following digit can't be absorbed into the escape.
pub fn escape_lua_string(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", c as u32)),
            c => out.push(c),
        }
    }
}
