//! The `delay` step: suspends for a fixed duration, cooperatively
//! cancellable.

use async_trait::async_trait;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use pk_registry::{Category, SecurityLevel, StepImpl};
use std::time::{Duration, Instant};

pub struct DelayStep;

#[async_trait]
impl StepImpl for DelayStep {
    fn name(&self) -> &str {
        "delay"
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
        let ms = args
            .named("ms")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow::anyhow!("delay step requires a numeric `ms` argument"))?;

        let started = Instant::now();
        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(ms)) => {}
            () = context.cancellation.cancelled() => {
                return Ok(StepResult::failed("delay cancelled", None).with_duration_ms(started.elapsed().as_millis() as u64));
            }
        }
        let duration_ms = started.elapsed().as_millis() as u64;
        Ok(StepResult::ok().with_duration_ms(duration_ms))
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
