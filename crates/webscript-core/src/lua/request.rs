/*
 * lua/request.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The read-only `request` parameter mapping.

use std::collections::BTreeMap;
use std::ops::Bound;

use mlua::{
    AnyUserData, Error, IntoLua, MetaMethod, UserData, UserDataMethods, UserDataRef, Value,
    Variadic,
};

/// Request parameters as seen by document code.
///
/// Supports `request["k"]`, `request.k`, `#request` and `pairs(request)`
/// (key order). Assigning to it raises an error.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters(pub BTreeMap<String, String>);

impl RequestParameters {
    /// The entry after `key` in key order, or the first entry for `nil`.
    fn next_entry(&self, key: &Value) -> Option<(&String, &String)> {
        match key {
            Value::Nil => self.0.iter().next(),
            Value::String(s) => {
                let key = s.to_string_lossy();
                self.0
                    .range::<str, _>((Bound::Excluded(key.as_str()), Bound::Unbounded))
                    .next()
            }
            _ => None,
        }
    }
}

impl UserData for RequestParameters {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Index, |_, this, key: Value| {
            Ok(match key {
                Value::String(s) => this.0.get(s.to_string_lossy().as_str()).cloned(),
                _ => None,
            })
        });

        methods.add_meta_method(
            MetaMethod::NewIndex,
            |_, _, _: (Value, Value)| -> mlua::Result<()> {
                Err(Error::runtime("request parameters are read-only"))
            },
        );

        methods.add_meta_method(MetaMethod::Len, |_, this, ()| Ok(this.0.len()));

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("RequestParameters({} entries)", this.0.len()))
        });

        // Stateless iterator: the control variable is the previous key.
        methods.add_meta_function(MetaMethod::Pairs, |lua, ud: AnyUserData| {
            let iter = lua.create_function(
                |lua, (this, key): (UserDataRef<RequestParameters>, Value)| {
                    match this.next_entry(&key) {
                        Some((k, v)) => Ok(Variadic::from_iter([
                            k.as_str().into_lua(lua)?,
                            v.as_str().into_lua(lua)?,
                        ])),
                        None => Ok(Variadic::new()),
                    }
                },
            )?;
            Ok((iter, ud, Value::Nil))
        });
    }
}
