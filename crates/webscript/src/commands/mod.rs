/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for the webscript CLI
//!
//! Each command module handles the CLI interface and delegates to
//! webscript-core for the actual work.

pub mod render;
pub mod transpile;
