//! Export shaped view rows to JSON.
//!
//! The document carries the route, resources and any inline errors next to
//! the rows, so downstream scripts can tell "empty" from "failed".

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::ViewOutput;
use crate::domain::{ShapeOptions, Shaped};
use crate::error::AppError;
use crate::views::ViewSpec;

#[derive(Debug, Serialize)]
struct ExportDoc<'a> {
    view: &'a str,
    title: &'a str,
    resources: Vec<&'a str>,
    options: &'a ShapeOptions,
    errors: Vec<String>,
    data: &'a Shaped,
}

/// Serialize a view's shaped output.
pub fn to_json(spec: &ViewSpec, output: &ViewOutput, options: &ShapeOptions) -> Result<String, AppError> {
    let doc = ExportDoc {
        view: spec.kind.path(),
        title: spec.title,
        resources: spec.resources(),
        options,
        errors: output.messages(),
        data: &output.shaped,
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| AppError::new(4, format!("Failed to serialize '{}': {e}", spec.kind.path())))
}

/// Write the export to `path`; `-` means stdout.
pub fn write_view_json(
    path: &Path,
    spec: &ViewSpec,
    output: &ViewOutput,
    options: &ShapeOptions,
) -> Result<(), AppError> {
    let json = to_json(spec, output, options)?;

    if path == Path::new("-") {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        writeln!(lock, "{json}").map_err(|e| AppError::new(4, format!("Failed to write export: {e}")))?;
        return Ok(());
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{json}")
        .and_then(|_| w.flush())
        .map_err(|e| AppError::new(4, format!("Failed to write export '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), view = spec.kind.path(), "wrote export");
    Ok(())
}
