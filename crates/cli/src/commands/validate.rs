//! `pk validate <script>`: load and check a definition against policy
//! without running anything. Useful as a CI pre-flight.

use crate::settings::CliSettings;
use anyhow::{Context, Result};
use clap::Args;
use pk_core::KernelError;
use pk_sandbox::SandboxManager;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the pipeline definition (YAML)
    pub script: PathBuf,
}

pub fn handle(args: ValidateArgs, settings: &CliSettings) -> Result<i32> {
    let source = std::fs::read_to_string(&args.script)
        .map_err(KernelError::Io)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let file_name = args.script.display().to_string();
    let (workflow, _source_map) = pk_loader::load_workflow(&source, &file_name)?;

    let manager = SandboxManager::new(settings.policy_ceiling());
    let validation = manager.validate(&workflow);
    if !validation.is_valid() {
        return Err(KernelError::PolicyViolation(validation).into());
    }

    println!("{} is valid: {} stage(s)", args.script.display(), workflow.stages.len());
    Ok(0)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
