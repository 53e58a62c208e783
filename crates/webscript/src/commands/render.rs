/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Runs one document the way a web front end would for a single request:
//! the document kind comes from the file extension, `-P KEY=VALUE` pairs
//! become the request parameters, and the response body goes to stdout.
//!
//! Exit codes:
//! - 0: success
//! - 1: the document failed (the error document is printed)
//! - 2: the document could not be read

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use webscript_core::{
    DocumentKind, EngineConfig, ExecutionContext, ScriptEngine, ScriptResult, processor_for,
};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Document to render
    pub path: PathBuf,
    /// Raw `KEY=VALUE` request parameters
    pub params: Vec<String>,
    /// Engine configuration file
    pub config: Option<PathBuf>,
    /// Time limit override
    pub timeout_ms: Option<u64>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    debug!(?config, "Engine configuration");
    config.install()?;

    let request = parse_params(&args.params)?;
    let kind = DocumentKind::from_path(&args.path).with_context(|| {
        format!(
            "Unsupported document {} (expected a .wsweb or .wscript file)",
            args.path.display()
        )
    })?;

    info!(path = %args.path.display(), ?kind, "Rendering");
    let result = processor_for(kind, ScriptEngine::default()).process_script(&args.path, &request);

    let code = match &result {
        ScriptResult::Success(_) => ExitCode::SUCCESS,
        ScriptResult::DocumentUnavailable { path, message } => {
            eprintln!("Document not found: {}: {message}", path.display());
            return Ok(ExitCode::from(2));
        }
        _ => ExitCode::from(1),
    };

    let response = result.into_response();
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(response.body.as_bytes())
        .context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;
    Ok(code)
}

fn parse_params(params: &[String]) -> Result<ExecutionContext> {
    let mut request = ExecutionContext::new();
    for param in params {
        let Some((key, value)) = ExecutionContext::parse_assignment(param) else {
            bail!("Invalid parameter '{param}' (expected KEY=VALUE)");
        };
        request.insert(key, value);
    }
    Ok(request)
}
