/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The script engine: scaffold, compile and invoke.
//!
//! Document code is wrapped as the body of an entry routine:
//!
//! ```text
//! return function(wout, request) <document code>
//! end
//! ```
//!
//! The first document line shares line 1 with the scaffold header, so line
//! numbers Lua reports are document line numbers. Every compile creates a
//! fresh Lua state; nothing from one execution is visible to the next.

use std::sync::Arc;
use std::time::Instant;

use mlua::{Function, Lua, LuaOptions};
use webscript_template::SINK_NAME;

use crate::config::EngineConfig;
use crate::context::ExecutionContext;
use crate::diagnostics::{compile_diagnostics, runtime_message};
use crate::document::SourceDocument;
use crate::error::{CompileFailure, RuntimeFailure};
use crate::lua::deadline;
use crate::lua::{
    OutputSink, REQUEST_NAME, RequestParameters, register_deadline_guards, register_prelude,
};
use crate::result::{Diagnostic, ScriptResult};

/// A compiled document: its own Lua state and the entry routine in it.
///
/// A unit is tied to the thread that compiled it.
pub struct CompiledUnit {
    lua: Lua,
    entry: Function,
    name: String,
}

impl CompiledUnit {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for CompiledUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledUnit")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Compiles and runs documents. Cheap to clone and safe to share between
/// threads; each call works on its own Lua state.
#[derive(Debug, Clone)]
pub struct ScriptEngine {
    config: Arc<EngineConfig>,
}

impl Default for ScriptEngine {
    /// An engine using the process-wide configuration.
    fn default() -> Self {
        Self::with_shared_config(EngineConfig::global())
    }
}

impl ScriptEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    pub fn with_shared_config(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Wrap document code in the entry-routine scaffold.
    pub fn scaffold(code: &str) -> String {
        format!("return function({SINK_NAME}, {REQUEST_NAME}) {code}\nend")
    }

    fn create_state(&self) -> mlua::Result<Lua> {
        let lua = Lua::new_with(self.config.std_lib(), LuaOptions::default())?;
        if let Some(limit) = self.config.memory_limit {
            lua.set_memory_limit(limit)?;
        }
        if self.config.prelude {
            register_prelude(&lua)?;
        }
        register_deadline_guards(&lua)?;
        Ok(lua)
    }

    /// Compile document code into a unit named `name`.
    pub fn compile(&self, name: &str, code: &str) -> Result<CompiledUnit, CompileFailure> {
        let started = Instant::now();
        let lua = self.create_state().map_err(|err| CompileFailure {
            diagnostics: vec![Diagnostic::new(1, 1, runtime_message(&err))],
        })?;

        let source = Self::scaffold(code);
        let entry = lua
            .load(source.as_str())
            .set_name(format!("@{name}"))
            .into_function()
            .and_then(|chunk| chunk.call::<Function>(()))
            .map_err(|err| CompileFailure {
                diagnostics: compile_diagnostics(&err, code),
            })?;

        tracing::debug!(
            document = name,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Compiled document"
        );
        Ok(CompiledUnit {
            lua,
            entry,
            name: name.to_string(),
        })
    }

    /// Run a compiled unit against `request` and return what it wrote.
    pub fn invoke(
        &self,
        unit: &CompiledUnit,
        request: &ExecutionContext,
    ) -> Result<String, RuntimeFailure> {
        let started = Instant::now();
        let sink = OutputSink::new();
        let params = RequestParameters(request.params().clone());

        let outcome = match self.config.timeout() {
            Some(limit) => deadline::arm(&unit.lua, limit)
                .and_then(|()| unit.entry.call::<()>((sink.clone(), params))),
            None => unit.entry.call::<()>((sink.clone(), params)),
        };
        deadline::disarm(&unit.lua);

        outcome.map_err(|err| RuntimeFailure {
            message: runtime_message(&err),
        })?;

        tracing::debug!(
            document = unit.name(),
            bytes = sink.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Invoked document"
        );
        Ok(sink.take())
    }

    /// Execute a document end to end. Templates are transpiled first.
    pub fn execute(&self, document: &SourceDocument, request: &ExecutionContext) -> ScriptResult {
        let script = match document.to_raw_script() {
            Ok(script) => script,
            Err(err) => {
                tracing::warn!(document = document.name(), error = %err, "Malformed document");
                return err.into();
            }
        };

        let unit = match self.compile(script.name(), script.text()) {
            Ok(unit) => unit,
            Err(failure) => {
                tracing::warn!(document = document.name(), error = %failure, "Compilation failed");
                return failure.into();
            }
        };

        match self.invoke(&unit, request) {
            Ok(output) => ScriptResult::Success(output),
            Err(failure) => {
                tracing::warn!(document = document.name(), error = %failure, "Runtime error");
                failure.into()
            }
        }
    }
}
