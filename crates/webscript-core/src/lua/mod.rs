/*
 * lua/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lua bindings visible to document code.
//!
//! - [`sink`]: `wout`, the output sink
//! - [`request`]: `request`, the read-only request parameters
//! - [`prelude`]: the `int`, `float` and `html` helper tables
//! - [`deadline`]: the execution time limit

pub mod deadline;
pub mod prelude;
pub mod request;
pub mod sink;

pub use deadline::register_deadline_guards;
pub use prelude::register_prelude;
pub use request::RequestParameters;
pub use sink::OutputSink;

/// Name of the request-parameter argument of the entry routine.
pub const REQUEST_NAME: &str = "request";

/// The textual value of a Lua value as written to the output sink.
///
/// `nil` is the empty string, strings are copied, and everything else goes
/// through the global `tostring` so `__tostring` metamethods are honoured.
pub(crate) fn display_value(lua: &mlua::Lua, value: mlua::Value) -> mlua::Result<String> {
    match value {
        mlua::Value::Nil => Ok(String::new()),
        mlua::Value::String(s) => Ok(s.to_string_lossy()),
        other => {
            let tostring: mlua::Function = lua.globals().get("tostring")?;
            tostring.call::<String>(other)
        }
    }
}
