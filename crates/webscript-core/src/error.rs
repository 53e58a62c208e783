/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for configuration, compilation and invocation.

use std::path::PathBuf;

use thiserror::Error;

use crate::result::Diagnostic;

/// Errors loading or installing an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The process-wide configuration can only be installed once.
    #[error("engine configuration is already installed")]
    AlreadyInstalled,
}

/// A document that did not compile. Diagnostics are in the order the Lua
/// compiler reported them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compilation failed with {} diagnostic(s)", .diagnostics.len())]
pub struct CompileFailure {
    pub diagnostics: Vec<Diagnostic>,
}

/// An error raised while a compiled document was running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeFailure {
    pub message: String,
}
