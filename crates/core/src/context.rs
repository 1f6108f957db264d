//! Per-invocation execution context: environment, working directory,
//! cancellation, and credential access handed to every step call.

use crate::env::EnvVars;
use crate::id::ExecutionId;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cooperative cancellation signal shared across a workflow run. Cloning
/// shares the same underlying flag; `cancel()` wakes every waiter.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Mark cancelled and wake every task waiting on `cancelled()`.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Resolves once `cancel()` has been called. Safe to await
    /// repeatedly; resolves immediately if already cancelled.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Derive a child token: cancelling the child does not cancel the
    /// parent, but cancelling the parent is not observed by the child
    /// either — used for retry attempts that should not abort siblings.
    pub fn fork(&self) -> Self {
        Self::new()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves secret material referenced by a step definition by name.
/// Production code looks these up from the process environment;
/// `test-support` callers can substitute a fixed map.
#[async_trait]
pub trait CredentialsLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Option<String>;
}

/// Default production lookup: reads from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialsLookup;

#[async_trait]
impl CredentialsLookup for EnvCredentialsLookup {
    async fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Everything a step implementation needs to run: its resolved
/// environment, working directory, identity, cancellation signal, and
/// a handle back to credential material.
#[derive(Clone)]
pub struct StepExecutionContext {
    pub execution_id: ExecutionId,
    pub env: EnvVars,
    pub working_dir: PathBuf,
    pub cancellation: CancellationToken,
    pub credentials: Arc<dyn CredentialsLookup>,
}

impl StepExecutionContext {
    pub fn new(execution_id: ExecutionId, env: EnvVars, working_dir: PathBuf) -> Self {
        Self {
            execution_id,
            env,
            working_dir,
            cancellation: CancellationToken::new(),
            credentials: Arc::new(EnvCredentialsLookup),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialsLookup>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// A child context carrying the same identity/cancellation but a
    /// narrower environment scope, used when entering a nested step
    /// sequence (retry attempt, parallel branch).
    pub fn child_env(&self, overrides: &EnvVars) -> StepExecutionContext {
        StepExecutionContext {
            execution_id: self.execution_id.clone(),
            env: self.env.child(overrides),
            working_dir: self.working_dir.clone(),
            cancellation: self.cancellation.clone(),
            credentials: self.credentials.clone(),
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
