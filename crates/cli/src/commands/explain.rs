//! `pk explain <script> <line> <col>`: resolve a position back through
//! the source map and render the full diagnostic for whatever
//! definition-time error that position falls on.

use anyhow::{Context, Result};
use clap::Args;
use pk_core::{EnhancedError, KernelError, Severity, SourceLocation};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Path to the pipeline definition (YAML)
    pub script: PathBuf,
    /// 1-based line to resolve
    pub line: usize,
    /// 0-based column to resolve
    pub col: usize,
}

pub fn handle(args: ExplainArgs) -> Result<i32> {
    let source = std::fs::read_to_string(&args.script)
        .map_err(KernelError::Io)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let file_name = args.script.display().to_string();

    let Err(error) = pk_loader::load_workflow(&source, &file_name) else {
        println!("{file_name} parses and validates cleanly; nothing to explain");
        return Ok(0);
    };

    let source_map = pk_loader::SourceMap::create_basic_mapping(&file_name, &source, &file_name);
    let (orig_line, orig_col, orig_file) = source_map
        .map_to_original(args.line, args.col)
        .unwrap_or((args.line, args.col, file_name.as_str()));

    let location = SourceLocation::new(orig_file, orig_line, orig_col, 0, 0);
    let excerpt = source_map.source_context(orig_line, orig_col, 2);
    let suggestions = pk_loader::suggest(&error.to_string(), pk_loader::KNOWN_STEP_NAMES);

    let mut enhanced = EnhancedError::new(error_code(&error), Severity::Error, error.to_string())
        .with_location(location)
        .with_excerpt(excerpt);
    for suggestion in suggestions {
        enhanced = enhanced.with_suggestion(suggestion);
    }

    println!("{}", enhanced.render_full());
    Ok(2)
}

fn error_code(error: &KernelError) -> &'static str {
    match error {
        KernelError::Definition { .. } => "PK001",
        KernelError::UnresolvedStep { .. } => "PK002",
        KernelError::PolicyViolation(_) => "PK003",
        _ => "PK000",
    }
}

#[cfg(test)]
#[path = "explain_tests.rs"]
mod tests;
