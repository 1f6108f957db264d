//! The `archiveArtifacts` step: copies every file matching a glob into
//! an `artifacts/` directory under the workflow's working directory.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::Instant;

pub struct ArchiveArtifactsStep;

#[async_trait]
impl StepImpl for ArchiveArtifactsStep {
    fn name(&self) -> &str {
        "archiveArtifacts"
    }

    fn category(&self) -> Category {
        Category::Build
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Restricted
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let pattern = args
            .named_str("glob")
            .ok_or_else(|| anyhow::anyhow!("archiveArtifacts step requires a `glob` argument"))?;
        let pattern = context.env.expand(pattern)?;

        let started = Instant::now();
        let working_dir = context.working_dir.clone();
        let pattern = pattern.clone();
        let copied = tokio::task::spawn_blocking(move || copy_matches(&working_dir, &pattern)).await??;
        let duration_ms = started.elapsed().as_millis() as u64;

        Ok(StepResult::ok_with_stdout(format!("archived {copied} file(s)")).with_duration_ms(duration_ms))
    }
}

fn copy_matches(working_dir: &std::path::Path, pattern: &str) -> Result<usize, anyhow::Error> {
    let artifacts_dir = working_dir.join("artifacts");
    std::fs::create_dir_all(&artifacts_dir)?;

    let full_pattern = working_dir.join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("glob pattern is not valid UTF-8"))?;

    let mut copied = 0;
    for entry in glob::glob(full_pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("matched entry has no file name"))?;
        std::fs::copy(&path, artifacts_dir.join(file_name))?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
