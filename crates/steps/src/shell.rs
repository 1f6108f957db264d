//! The `sh` step: runs a command through `bash -c` in the step's
//! resolved working directory and environment.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::Instant;
use tokio::process::Command;

pub struct ShellStep;

#[async_trait]
impl StepImpl for ShellStep {
    fn name(&self) -> &str {
        "sh"
    }

    fn category(&self) -> Category {
        Category::Build
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Dangerous
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let command = args
            .named_str("command")
            .ok_or_else(|| anyhow::anyhow!("sh step requires a `command` argument"))?;
        let command = context.env.expand(command)?;
        let return_stdout = args
            .named("return_stdout")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        let wrapped = format!("set -euo pipefail\n{command}");
        let started = Instant::now();
        let output = Command::new("bash")
            .arg("-c")
            .arg(&wrapped)
            .current_dir(&context.working_dir)
            .envs(context.env.to_pairs())
            .output()
            .await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        let result = StepResult {
            success: output.status.success(),
            stdout: if return_stdout { stdout } else { String::new() },
            stderr,
            exit_code,
            duration_ms,
        };
        Ok(result)
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
