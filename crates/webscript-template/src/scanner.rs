/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Single pass scanner splitting a template into [`CodeFragment`]s.
//!
//! Literal text is accumulated until a code delimiter appears. `@{` opens an
//! expression block and a bare `{` opens a statement block; since `@{` also
//! contains a `{`, it is recognised on the `@`. A block extends to the `}` that
//! brings the brace depth back to zero. Braces are counted lexically, so a
//! brace inside a Lua string literal still counts.
//!
//! Code bodies are opaque: no template syntax is recognised inside them.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{TranspileError, TranspileResult};
use crate::fragment::CodeFragment;

/// Scan a template into fragments in document order.
///
/// Empty literal runs are not emitted, so two adjacent code blocks produce two
/// adjacent code fragments.
pub fn scan(source: &str) -> TranspileResult<Vec<CodeFragment>> {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    literal: String,
    fragments: Vec<CodeFragment>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            literal: String::new(),
            fragments: Vec::new(),
        }
    }

    fn run(mut self) -> TranspileResult<Vec<CodeFragment>> {
        while let Some((offset, c)) = self.chars.next() {
            match c {
                '@' if self.next_is('{') => {
                    self.chars.next();
                    self.flush_literal();
                    let body = self.block_body(offset, offset + 2)?;
                    self.fragments
                        .push(CodeFragment::Expression(body.to_string()));
                }
                '{' if self.next_is('{') => {
                    // `{{` escapes a literal brace
                    self.chars.next();
                    self.literal.push('{');
                }
                '{' => {
                    self.flush_literal();
                    let body = self.block_body(offset, offset + 1)?;
                    self.fragments.push(CodeFragment::Statement(body.to_string()));
                }
                _ => self.literal.push(c),
            }
        }
        self.flush_literal();
        Ok(self.fragments)
    }

    fn next_is(&mut self, expected: char) -> bool {
        matches!(self.chars.peek(), Some(&(_, c)) if c == expected)
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let text = std::mem::take(&mut self.literal);
            self.fragments.push(CodeFragment::Literal(text));
        }
    }

    /// Consume characters up to and including the `}` matching an opening
    /// delimiter at `open`, returning the text between `body_start` and that `}`.
    fn block_body(&mut self, open: usize, body_start: usize) -> TranspileResult<&'a str> {
        let source = self.source;
        let mut depth = 1usize;
        for (offset, c) in self.chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&source[body_start..offset]);
                    }
                }
                _ => {}
            }
        }
        let (line, column) = line_column(source, open);
        Err(TranspileError::UnterminatedBlock {
            offset: open,
            line,
            column,
        })
    }
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> CodeFragment {
        CodeFragment::Literal(s.to_string())
    }

    fn stmt(s: &str) -> CodeFragment {
        CodeFragment::Statement(s.to_string())
    }

    fn expr(s: &str) -> CodeFragment {
        CodeFragment::Expression(s.to_string())
    }

    #[test]
    fn test_plain_markup() {
        let fragments = scan("<p>no code here</p>").unwrap();
        assert_eq!(fragments, vec![lit("<p>no code here</p>")]);
    }

    #[test]
    fn test_empty_template() {
        assert!(scan("").unwrap().is_empty());
    }

    #[test]
    fn test_statement_block() {
        let fragments = scan(r#"Hello {wout.Write("World");}!"#).unwrap();
        assert_eq!(
            fragments,
            vec![lit("Hello "), stmt(r#"wout.Write("World");"#), lit("!")]
        );
    }

    #[test]
    fn test_expression_block() {
        let fragments = scan(r#"<b>@{request["name"]}</b>"#).unwrap();
        assert_eq!(
            fragments,
            vec![lit("<b>"), expr(r#"request["name"]"#), lit("</b>")]
        );
    }

    #[test]
    fn test_nested_braces_in_statement() {
        let fragments = scan("a{ if x then t = { 1, { 2 } } end }b").unwrap();
        assert_eq!(
            fragments,
            vec![lit("a"), stmt(" if x then t = { 1, { 2 } } end "), lit("b")]
        );
    }

    #[test]
    fn test_nested_braces_in_expression() {
        let fragments = scan("@{ #{ 1, 2, 3 } }").unwrap();
        assert_eq!(fragments, vec![expr(" #{ 1, 2, 3 } ")]);
    }

    #[test]
    fn test_adjacent_blocks() {
        let fragments = scan("{a()}@{b}{c()}").unwrap();
        assert_eq!(fragments, vec![stmt("a()"), expr("b"), stmt("c()")]);
    }

    #[test]
    fn test_escaped_brace() {
        let fragments = scan("body {{ color: red; }").unwrap();
        assert_eq!(fragments, vec![lit("body { color: red; }")]);
    }

    #[test]
    fn test_lone_at_and_close_brace_are_literal() {
        let fragments = scan("mail@example.com }").unwrap();
        assert_eq!(fragments, vec![lit("mail@example.com }")]);
    }

    #[test]
    fn test_expression_inside_statement_is_opaque() {
        let fragments = scan("{ x = @{y} }").unwrap();
        assert_eq!(fragments, vec![stmt(" x = @{y} ")]);
    }

    #[test]
    fn test_multibyte_text_around_blocks() {
        let fragments = scan("héllo @{x} wörld").unwrap();
        assert_eq!(fragments, vec![lit("héllo "), expr("x"), lit(" wörld")]);
    }

    #[test]
    fn test_unterminated_statement() {
        let err = scan("Hello { code").unwrap_err();
        assert_eq!(
            err,
            TranspileError::UnterminatedBlock {
                offset: 6,
                line: 1,
                column: 7,
            }
        );
        assert_eq!(err.to_string(), "unterminated code block at offset 6");
    }

    #[test]
    fn test_unterminated_nested_expression() {
        let err = scan("line one\n  @{ f({ x }) ").unwrap_err();
        assert_eq!(
            err,
            TranspileError::UnterminatedBlock {
                offset: 11,
                line: 2,
                column: 3,
            }
        );
    }

    #[test]
    fn test_unterminated_at_end_of_input() {
        let err = scan("abc@{").unwrap_err();
        assert!(matches!(
            err,
            TranspileError::UnterminatedBlock { offset: 3, .. }
        ));
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("a\nbc", 3), (2, 2));
        assert_eq!(line_column("é\nü{", 5), (2, 2));
    }
}
