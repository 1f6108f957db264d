//! Fake step implementation for testing the registry, engine, and sandbox
//! without spawning real processes.

use crate::step::{Category, SecurityLevel, StepImpl};
use async_trait::async_trait;
use parking_lot::Mutex;
use pk_core::{StepArgs, StepArgsView, StepExecutionContext, StepResult};
use std::sync::Arc;

/// A recorded call to a `FakeStepImpl`.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeCall {
    pub args: StepArgs,
}

/// A step implementation that records every call it receives and
/// returns a preconfigured result, or fails if configured to.
pub struct FakeStepImpl {
    name: String,
    category: Category,
    security_level: SecurityLevel,
    result: Mutex<StepResult>,
    calls: Arc<Mutex<Vec<FakeCall>>>,
}

impl FakeStepImpl {
    pub fn new(name: impl Into<String>, security_level: SecurityLevel) -> Self {
        Self {
            name: name.into(),
            category: Category::Util,
            security_level,
            result: Mutex::new(StepResult::ok()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_result(self, result: StepResult) -> Self {
        *self.result.lock() = result;
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StepImpl for FakeStepImpl {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    async fn execute(
        &self,
        _context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error> {
        self.calls.lock().push(FakeCall {
            args: args.to_owned_args(),
        });
        Ok(self.result.lock().clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
