//! The `echo` step: writes a message to the step's stdout without
//! spawning a subprocess.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::Instant;

pub struct EchoStep;

#[async_trait]
impl StepImpl for EchoStep {
    fn name(&self) -> &str {
        "echo"
    }

    fn category(&self) -> Category {
        Category::Util
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Trusted
    }

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        let message = args
            .named_str("message")
            .ok_or_else(|| anyhow::anyhow!("echo step requires a `message` argument"))?;
        let started = Instant::now();
        let message = context.env.expand(message)?;
        let duration_ms = started.elapsed().as_millis() as u64;
        Ok(StepResult::ok_with_stdout(message).with_duration_ms(duration_ms))
    }
}

#[cfg(test)]
#[path = "echo_tests.rs"]
mod tests;
