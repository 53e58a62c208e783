/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template transpiler for webscript pages.
//!
//! A template is markup with embedded Lua code. Two kinds of code block are
//! recognised:
//!
//! - Statement blocks: `{ code }` run the code and produce no output by themselves
//! - Expression blocks: `@{ expr }` write the value of `expr` to the output
//!
//! `{{` in markup stands for a literal `{`. Everything else is literal text.
//!
//! `{ return }` ends the page early; it is lowered to Lua's `do return end`.
//! A `--` comment may end any code block.
//!
//! Transpiling is a two step process. [`scan`] splits the template into an
//! ordered list of [`CodeFragment`]s, and [`lower`] turns those fragments into a
//! plain script in which every literal becomes a write to the output sink. The
//! generated script keeps the line structure of the template, so line numbers
//! reported while compiling or running it point at template lines.
//!
//! # Example
//!
//! ```
//! use webscript_template::transpile;
//!
//! let script = transpile("Hello @{name}!").unwrap();
//! assert_eq!(script, r#"wout.Write("Hello ");wout.Write(name);wout.Write("!");"#);
//! ```

pub mod error;
pub mod fragment;
pub mod lower;
pub mod scanner;

pub use error::{TranspileError, TranspileResult};
pub use fragment::CodeFragment;
pub use lower::{escape_lua_string, lower};
pub use scanner::scan;

/// Name of the output sink that lowered literals and expressions write to.
pub const SINK_NAME: &str = "wout";

/// Transpile a template into an equivalent plain script.
pub fn transpile(source: &str) -> TranspileResult<String> {
    let fragments = scan(source)?;
    Ok(lower(&fragments))
}
