/*
 * transpile_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for template scanning and lowering.
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use webscript_template::{CodeFragment, TranspileError, scan, transpile};

/// Undo the literal lowering of a generated script: collect the string
/// arguments of every `wout.Write("...")` call that carries a literal.
fn literal_writes(script: &str) -> String {
    let mut out = String::new();
    let mut rest = script;
    while let Some(start) = rest.find("wout.Write(\"") {
        rest = &rest[start + "wout.Write(\"".len()..];
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    rest = &rest[i..];
                    break;
                }
                '\\' => match chars.next().map(|(_, e)| e) {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => {}
                },
                c => out.push(c),
            }
        }
    }
    out
}

#[test]
fn test_hello_world_statement() {
    let script = transpile(r#"Hello {wout.Write("World");}!"#).unwrap();
    assert_eq!(
        script,
        r#"wout.Write("Hello ");wout.Write("World");;wout.Write("!");"#
    );
}

#[test]
fn test_request_expression() {
    let script = transpile(r#"@{request["name"]}"#).unwrap();
    assert_eq!(script, r#"wout.Write(request["name"]);"#);
}

#[test]
fn test_loop_spanning_fragments() {
    let template = "<ul>{ for i = 1, 3 do }<li>@{i}</li>{ end }</ul>";
    let fragments = scan(template).unwrap();
    assert_eq!(fragments.len(), 7);
    assert_eq!(
        transpile(template).unwrap(),
        r#"wout.Write("<ul>"); for i = 1, 3 do ;wout.Write("<li>");wout.Write(i);wout.Write("</li>"); end ;wout.Write("</ul>");"#
    );
}

#[test]
fn test_quotes_in_markup_cannot_escape_the_string() {
    let script = transpile(r#"<a href="x">"); os.exit(1) --</a>"#).unwrap();
    assert_eq!(
        script,
        r#"wout.Write("<a href=\"x\">\"); os.exit(1) --</a>");"#
    );
}

#[test]
fn test_generated_lines_match_template_lines() {
    let template = "<html>\n<body>\n{ local n = 2\n}@{n}\n</body>\n</html>";
    let script = transpile(template).unwrap();
    assert_eq!(script.lines().count(), template.lines().count());
    let n_line = script.lines().nth(2).unwrap();
    assert!(n_line.contains("local n = 2"));
}

#[test]
fn test_unterminated_block_reports_offset() {
    let err = transpile("<p>{ if x then </p>").unwrap_err();
    assert_eq!(
        err,
        TranspileError::UnterminatedBlock {
            offset: 3,
            line: 1,
            column: 4,
        }
    );
}

#[test]
fn test_nested_statement_body_spans_inner_braces() {
    let fragments = scan("{ if x then y({ }) end }").unwrap();
    assert_eq!(
        fragments,
        vec![CodeFragment::Statement(" if x then y({ }) end ".to_string())]
    );
}

/// Markup without delimiter characters, heavy on characters that need escaping.
fn markup() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>/=\"'\\\\\n\r\t.,;:!é✓-]{0,24}"
}

/// Code without braces or quotes, so a block never nests.
fn code() -> impl Strategy<Value = String> {
    "[a-z0-9 +*.()]{0,12}"
}

proptest! {
    #[test]
    fn prop_literal_regions_survive_transpiling(
        pieces in prop::collection::vec((markup(), code(), any::<bool>()), 0..6),
        tail in markup(),
    ) {
        let mut template = String::new();
        let mut expected_literal = String::new();
        for (text, body, is_expression) in &pieces {
            template.push_str(text);
            expected_literal.push_str(text);
            template.push_str(if *is_expression { "@{" } else { "{" });
            template.push_str(body);
            template.push('}');
        }
        template.push_str(&tail);
        expected_literal.push_str(&tail);

        let fragments = scan(&template).unwrap();
        let literal: String = fragments
            .iter()
            .filter(|f| f.is_literal())
            .map(|f| f.text())
            .collect();
        prop_assert_eq!(&literal, &expected_literal);

        let code_count = fragments.iter().filter(|f| !f.is_literal()).count();
        prop_assert_eq!(code_count, pieces.len());

        // Code bodies here contain no quotes, so every quoted write in the
        // output comes from a literal.
        let script = transpile(&template).unwrap();
        prop_assert_eq!(literal_writes(&script), expected_literal);
    }
}
