//! `pk run <script>`: load, validate against policy, execute, and map
//! the resulting workflow status to the external interface's exit-code
//! contract.

use crate::settings::CliSettings;
use anyhow::{Context, Result};
use clap::Args;
use pk_core::{CancellationReason, CancellationToken, ExecutionId, KernelError, Status};
use pk_engine::{EngineConfig, Executor, WorkflowReport};
use pk_registry::Registry;
use pk_sandbox::{ProcessIsolationBinder, SandboxManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the pipeline definition (YAML)
    pub script: PathBuf,
    /// Working directory steps execute in (defaults to the script's directory)
    #[arg(long = "working-dir")]
    pub working_dir: Option<PathBuf>,
}

pub async fn handle(args: RunArgs, settings: &CliSettings) -> Result<i32> {
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

    let working_dir = args
        .working_dir
        .or_else(|| args.script.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let executor = Executor::new(Arc::new(registry), Arc::new(ProcessIsolationBinder), EngineConfig::default());

    let cancellation = CancellationToken::new();
    let watched = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received interrupt, cancelling run");
            watched.cancel();
        }
    });

    let report = executor
        .run_workflow(&workflow, ExecutionId::new("run"), working_dir, cancellation, CancellationReason::UserAbort)
        .await;

    print_report(&report);

    Ok(match report.status {
        Status::Success | Status::Unstable => 0,
        Status::Failure => 1,
        Status::Aborted => 3,
        Status::Pending | Status::Running => 4,
    })
}

fn print_report(report: &WorkflowReport) {
    for stage in &report.stages {
        println!("stage {}: {:?}", stage.name, stage.status);
        for step in &stage.steps {
            println!("  {}: {:?}", step.name, step.status);
            if let Some(result) = &step.result {
                if !result.stdout.is_empty() {
                    print!("{}", result.stdout);
                }
            }
            if let Some(error) = &step.error {
                eprintln!("  {error}");
            }
        }
    }
    println!("workflow: {:?}", report.status);
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
