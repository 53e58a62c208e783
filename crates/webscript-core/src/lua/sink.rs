/*
 * lua/sink.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `wout` output sink.
//!
//! Document code writes with `wout.Write(a, b, ...)` and
//! `wout.WriteLine(...)`. The method-call forms `wout:Write(...)` work too:
//! when the first argument is the sink itself it is skipped.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Error, Lua, MetaMethod, Result, UserData, UserDataMethods, Value, Variadic};

use super::display_value;

/// Accumulates everything a document writes. Cloning shares the buffer, so
/// the host keeps a handle while Lua owns the userdata.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    buffer: Rc<RefCell<String>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the accumulated output, leaving the buffer empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    fn write_function(&self, lua: &Lua, newline: bool) -> Result<mlua::Function> {
        let buffer = Rc::clone(&self.buffer);
        lua.create_function(move |lua, args: Variadic<Value>| {
            let skip = match args.first() {
                Some(Value::UserData(ud)) if ud.is::<OutputSink>() => 1,
                _ => 0,
            };
            let mut text = String::new();
            for value in args.iter().skip(skip) {
                text.push_str(&display_value(lua, value.clone())?);
            }
            if newline {
                text.push('\n');
            }
            buffer.borrow_mut().push_str(&text);
            Ok(())
        })
    }
}

impl UserData for OutputSink {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Index, |lua, this, key: Value| {
            let Value::String(key) = key else {
                return Ok(Value::Nil);
            };
            match key.to_string_lossy().as_str() {
                "Write" => Ok(Value::Function(this.write_function(lua, false)?)),
                "WriteLine" => Ok(Value::Function(this.write_function(lua, true)?)),
                _ => Ok(Value::Nil),
            }
        });

        methods.add_meta_method(
            MetaMethod::NewIndex,
            |_, _, (key, _): (Value, Value)| -> Result<()> {
                let key = match key {
                    Value::String(s) => s.to_string_lossy(),
                    other => other.type_name().to_string(),
                };
                Err(Error::runtime(format!(
                    "cannot assign to field '{key}' of wout"
                )))
            },
        );

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("OutputSink({} bytes)", this.len()))
        });
    }
}
