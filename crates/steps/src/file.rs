//! The `readFile` and `writeFile` steps.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::Instant;

pub struct ReadFileStep;

#[async_trait]
impl StepImpl for ReadFileStep {
    fn name(&self) -> &str {
        "readFile"
    }

    fn category(&self) -> Category {
        Category::Util
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Restricted
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let path = args
            .named_str("path")
            .ok_or_else(|| anyhow::anyhow!("readFile step requires a `path` argument"))?;
        let path = context.env.expand(path)?;
        let return_stdout = args
            .named("return_stdout")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        let started = Instant::now();
        let resolved = context.working_dir.join(&path);
        let contents = tokio::fs::read_to_string(&resolved).await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        Ok(StepResult {
            success: true,
            stdout: if return_stdout { contents } else { String::new() },
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms,
        })
    }
}

pub struct WriteFileStep;

#[async_trait]
impl StepImpl for WriteFileStep {
    fn name(&self) -> &str {
        "writeFile"
    }

    fn category(&self) -> Category {
        Category::Util
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Restricted
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let path = args
            .named_str("path")
            .ok_or_else(|| anyhow::anyhow!("writeFile step requires a `path` argument"))?;
        let content = args
            .named_str("content")
            .ok_or_else(|| anyhow::anyhow!("writeFile step requires a `content` argument"))?;
        let path = context.env.expand(path)?;
        let content = context.env.expand(content)?;

        let started = Instant::now();
        let resolved = context.working_dir.join(&path);
        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&resolved, content.as_bytes()).await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        Ok(StepResult::ok().with_duration_ms(duration_ms))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
