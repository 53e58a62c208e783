/*
 * transpile.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Transpile command implementation.
//!
//! Prints the script a template lowers to, which is what the engine
//! compiles. Useful when a compile error points at a template line.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

/// Execute the transpile command
pub fn execute(path: &Path) -> Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let script = webscript_template::transpile(&source)
        .with_context(|| format!("Failed to transpile {}", path.display()))?;
    println!("{script}");
    Ok(ExitCode::SUCCESS)
}
