//! The step dispatch contract and the name-keyed registry of implementations.

use async_trait::async_trait;
use indexmap::IndexMap;
use pk_core::{StepArgsView, StepExecutionContext, StepResult};
use std::sync::Arc;
use thiserror::Error;

/// The trust tier a step implementation runs at, used by the sandbox
/// manager's policy validation to decide what isolation a step requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityLevel {
    Trusted,
    Restricted,
    Dangerous,
}

/// The functional category a step belongs to, used for reporting and
/// policy grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Build,
    Test,
    Deploy,
    Scm,
    Notification,
    Security,
    Util,
}

/// A runnable step implementation, looked up by name from the registry
/// and invoked by the engine once per step node.
#[async_trait]
pub trait StepImpl: Send + Sync {
    /// Dispatch name this implementation answers to.
    fn name(&self) -> &str;

    fn category(&self) -> Category;

    fn security_level(&self) -> SecurityLevel;

    async fn execute(
        &self,
        context: &StepExecutionContext,
        args: StepArgsView<'_>,
    ) -> Result<StepResult, anyhow::Error>;
}

/// No implementation is registered under the requested name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unresolved step {0:?}")]
pub struct UnresolvedStep(pub String);

/// Name-keyed table of step implementations. Registration order is
/// preserved so `known_names()` can drive deterministic suggestion
/// output.
///
/// Lookup is two-tiered: a mock override, when one is registered under
/// the requested name, always wins over the production implementation.
/// Clearing a mock restores whatever was registered in the production
/// tier, rather than leaving the name unresolved.
#[derive(Clone, Default)]
pub struct Registry {
    steps: IndexMap<String, Arc<dyn StepImpl>>,
    mocks: IndexMap<String, Arc<dyn StepImpl>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a production implementation under its own
    /// `name()`. Does not disturb any mock override for the same name.
    pub fn register(&mut self, step: Arc<dyn StepImpl>) {
        self.steps.insert(step.name().to_string(), step);
    }

    /// Register a mock override under its own `name()`, shadowing the
    /// production implementation (if any) until unregistered.
    pub fn register_mock(&mut self, step: Arc<dyn StepImpl>) {
        self.mocks.insert(step.name().to_string(), step);
    }

    /// Remove the mock override for `name`, restoring the production
    /// implementation it was shadowing.
    pub fn unregister_mock(&mut self, name: &str) {
        self.mocks.shift_remove(name);
    }

    /// Remove every mock override, restoring production implementations
    /// for all shadowed names.
    pub fn clear_mocks(&mut self) {
        self.mocks.clear();
    }

    /// Lookup order: mock override, then the registered production
    /// implementation, then `UnresolvedStep`.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn StepImpl>, UnresolvedStep> {
        self.mocks
            .get(name)
            .or_else(|| self.steps.get(name))
            .cloned()
            .ok_or_else(|| UnresolvedStep(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mocks.contains_key(name) || self.steps.contains_key(name)
    }

    /// All registered dispatch names, in registration order. Mock-only
    /// names (no production counterpart) are included.
    pub fn known_names(&self) -> Vec<&str> {
        self.steps
            .keys()
            .chain(self.mocks.keys().filter(|k| !self.steps.contains_key(*k)))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.known_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.mocks.is_empty()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
