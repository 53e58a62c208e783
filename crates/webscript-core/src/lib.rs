/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Request-time execution of webscript documents.
//!
//! A document is either a raw script (plain Lua) or a template (markup with
//! embedded Lua, see [`webscript_template`]). Either way it ends up as Lua code
//! that is wrapped in a fixed scaffold, compiled, and invoked with two names in
//! scope:
//!
//! - `wout`: the output sink (`wout.Write(...)`, `wout.WriteLine(...)`)
//! - `request`: the read-only request parameters (`request["name"]`)
//!
//! Every request compiles its document from scratch; nothing is cached between
//! calls. The only state shared between concurrent calls is the read-only
//! [`EngineConfig`].
//!
//! # Architecture
//!
//! - [`document`]: source documents and their kinds
//! - [`engine`]: the [`ScriptEngine`] (scaffold, compile, invoke)
//! - [`lua`]: the Lua bindings visible to document code
//! - [`result`]: [`ScriptResult`], diagnostics and the HTML error document
//! - [`processor`]: the path based entry points used by front ends
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use webscript_core::{ExecutionContext, ScriptEngine, ScriptProcessor, TemplateProcessor};
//!
//! let processor = TemplateProcessor::new(ScriptEngine::default());
//! let request = ExecutionContext::from_iter([("name", "Ada")]);
//! let result = processor.process_script(Path::new("pages/hello.wsweb"), &request);
//! let response = result.into_response();
//! println!("{}", response.body);
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod error;
mod html;
pub mod lua;
pub mod processor;
pub mod result;

pub use config::{EngineConfig, LuaLibrary};
pub use context::ExecutionContext;
pub use document::{DocumentKind, SourceDocument};
pub use engine::{CompiledUnit, ScriptEngine};
pub use error::{CompileFailure, ConfigError, RuntimeFailure};
pub use processor::{RawScriptProcessor, ScriptProcessor, TemplateProcessor, processor_for};
pub use result::{Diagnostic, Response, ScriptResult};
