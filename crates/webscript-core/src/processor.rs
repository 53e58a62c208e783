/*
 * processor.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Path-based entry points for front ends.
//!
//! A front end maps a request to a file, picks a processor by the file's
//! kind and hands the result's [`Response`](crate::Response) back to the
//! client. Processors hold no per-request state and can be shared freely.

use std::path::Path;

use crate::context::ExecutionContext;
use crate::document::{DocumentKind, SourceDocument};
use crate::engine::ScriptEngine;
use crate::result::ScriptResult;

/// Executes the document at a path.
pub trait ScriptProcessor: Send + Sync {
    /// Read, compile and run the document at `path` against `request`.
    ///
    /// An unreadable file yields [`ScriptResult::DocumentUnavailable`].
    fn process_script(&self, path: &Path, request: &ExecutionContext) -> ScriptResult;

    /// The kind of document this processor expects.
    fn kind(&self) -> DocumentKind;
}

fn load_and_execute(
    engine: &ScriptEngine,
    kind: DocumentKind,
    path: &Path,
    request: &ExecutionContext,
) -> ScriptResult {
    match SourceDocument::load(path, kind) {
        Ok(document) => engine.execute(&document, request),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Document unavailable");
            ScriptResult::DocumentUnavailable {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }
}

/// Runs files containing plain Lua code.
#[derive(Debug, Clone, Default)]
pub struct RawScriptProcessor {
    engine: ScriptEngine,
}

impl RawScriptProcessor {
    pub fn new(engine: ScriptEngine) -> Self {
        Self { engine }
    }
}

impl ScriptProcessor for RawScriptProcessor {
    fn process_script(&self, path: &Path, request: &ExecutionContext) -> ScriptResult {
        load_and_execute(&self.engine, DocumentKind::RawScript, path, request)
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::RawScript
    }
}

/// Runs template files. The transpiled script only ever lives in memory.
#[derive(Debug, Clone, Default)]
pub struct TemplateProcessor {
    engine: ScriptEngine,
}

impl TemplateProcessor {
    pub fn new(engine: ScriptEngine) -> Self {
        Self { engine }
    }
}

impl ScriptProcessor for TemplateProcessor {
    fn process_script(&self, path: &Path, request: &ExecutionContext) -> ScriptResult {
        load_and_execute(&self.engine, DocumentKind::Template, path, request)
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Template
    }
}

/// The processor for documents of `kind`.
pub fn processor_for(kind: DocumentKind, engine: ScriptEngine) -> Box<dyn ScriptProcessor> {
    match kind {
        DocumentKind::RawScript => Box::new(RawScriptProcessor::new(engine)),
        DocumentKind::Template => Box::new(TemplateProcessor::new(engine)),
    }
}
