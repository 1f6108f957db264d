//! Top-level entry point: parse a YAML pipeline definition into a
//! validated `Workflow`, plus the `SourceMap` needed to resolve later
//! diagnostics back to the original file.

use crate::proptree::PropertyTree;
use crate::sourcemap::SourceMap;
use crate::validate::validate_workflow;
use pk_core::{KernelError, Workflow};

/// Load and fully validate a workflow definition. Returns the typed
/// graph plus a source map for later diagnostic rendering. No steps
/// run here — this is the "definition/validation" half of the CLI's
/// exit-code contract (§6).
///
/// Parses into a property tree first to give a precise path for the
/// common "stages missing/wrong shape" mistake before falling back to
/// full typed deserialization, whose errors are harder to pin to a
/// path for hand-authored YAML.
pub fn load_workflow(source: &str, file_name: &str) -> Result<(Workflow, SourceMap), KernelError> {
    let raw: serde_json::Value = serde_yaml::from_str(source).map_err(|e| definition_error(file_name, &e))?;
    check_top_level_shape(&raw)?;

    let workflow: Workflow = serde_yaml::from_str(source).map_err(|e| definition_error(file_name, &e))?;
    validate_workflow(&workflow)?;
    let source_map = SourceMap::create_basic_mapping(file_name, source, file_name);
    Ok((workflow, source_map))
}

fn check_top_level_shape(raw: &serde_json::Value) -> Result<(), KernelError> {
    let tree = PropertyTree::root(raw, "");
    match tree.get("stages")? {
        Some(stages) if stages.is_array() => Ok(()),
        Some(_) => Err(KernelError::Definition {
            path: "stages".to_string(),
            message: "`stages` must be a sequence of stage definitions".to_string(),
        }),
        None => Err(KernelError::Definition {
            path: "stages".to_string(),
            message: "a workflow definition must declare `stages`".to_string(),
        }),
    }
}

fn definition_error(file_name: &str, error: &serde_yaml::Error) -> KernelError {
    let path = match error.location() {
        Some(loc) => format!("{file_name}:{}:{}", loc.line(), loc.column()),
        None => file_name.to_string(),
    };
    KernelError::Definition {
        path,
        message: error.to_string(),
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
