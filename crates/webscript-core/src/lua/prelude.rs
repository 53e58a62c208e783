/*
 * lua/prelude.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Helper tables installed for document code: `int`, `float` and `html`.

use mlua::{Error, Lua, Result};

use crate::html::escape_html;

/// Register `int.Parse`, `float.Parse` and `html.Encode` as globals.
pub fn register_prelude(lua: &Lua) -> Result<()> {
    let int = lua.create_table()?;
    int.set(
        "Parse",
        lua.create_function(|_, s: String| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| format_error(&s, "int.Parse"))
        })?,
    )?;
    lua.globals().set("int", int)?;

    let float = lua.create_table()?;
    float.set(
        "Parse",
        lua.create_function(|_, s: String| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| format_error(&s, "float.Parse"))
        })?,
    )?;
    lua.globals().set("float", float)?;

    let html = lua.create_table()?;
    html.set(
        "Encode",
        lua.create_function(|_, s: String| Ok(escape_html(&s)))?,
    )?;
    lua.globals().set("html", html)?;

    Ok(())
}

fn format_error(input: &str, function: &str) -> Error {
    Error::runtime(format!(
        "input string \"{input}\" was not in a correct format for {function}"
    ))
}
