//! The `checkout` step: clones (or updates) a git repository into the
//! step's working directory.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::Instant;
use tokio::process::Command;

pub struct CheckoutStep;

#[async_trait]
impl StepImpl for CheckoutStep {
    fn name(&self) -> &str {
        "checkout"
    }

    fn category(&self) -> Category {
        Category::Scm
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Restricted
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let url = args
            .named_str("url")
            .ok_or_else(|| anyhow::anyhow!("checkout step requires a `url` argument"))?;
        let url = context.env.expand(url)?;
        let branch = args.named_str("branch");

        let started = Instant::now();
        let mut command = Command::new("git");
        command.arg("clone").arg("--depth").arg("1");
        if let Some(branch) = branch {
            command.arg("--branch").arg(branch);
        }
        command
            .arg(&url)
            .arg(".")
            .current_dir(&context.working_dir)
            .envs(context.env.to_pairs());

        let output = command.output().await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        Ok(StepResult {
            success: output.status.success(),
            stdout: String::new(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration_ms,
        })
    }
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;
