//! Binds a step invocation to its declared `IsolationLevel`.

use async_trait::async_trait;
use pk_core::IsolationLevel;
use std::future::Future;
use thiserror::Error;

/// The requested isolation level could not be established.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsolationError {
    #[error("isolation level {0:?} is not supported by this kernel build")]
    Unsupported(IsolationLevel),
    #[error("failed to bind isolation: {0}")]
    BindFailed(String),
}

/// Runs a future under a given isolation level. `None` and `Thread` run
/// directly on the async runtime (the difference is purely in how the
/// resource enforcer accounts for the work); `Process` isolation is
/// expected to already be provided by the step implementation itself
/// (a shell step spawns a real child process) — this binder just
/// confirms the level is supported and detaches the work onto its own
/// task so a stalled step can't block the scheduler.
#[async_trait]
pub trait IsolationBinder: Send + Sync {
    async fn bind<F, Fut, T>(&self, level: IsolationLevel, work: F) -> Result<T, IsolationError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static;
}

/// The kernel's one real binder, covering `None`, `Thread`, and
/// `Process`. `Classloader` and `Container` are documented stubs: the
/// engine does not embed a JVM or a container runtime, so those levels
/// are accepted at the definition level but rejected at bind time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIsolationBinder;

#[async_trait]
impl IsolationBinder for ProcessIsolationBinder {
    async fn bind<F, Fut, T>(&self, level: IsolationLevel, work: F) -> Result<T, IsolationError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        match level {
            IsolationLevel::None => Ok(work().await),
            IsolationLevel::Thread | IsolationLevel::Process => tokio::spawn(work())
                .await
                .map_err(|e| IsolationError::BindFailed(e.to_string())),
            IsolationLevel::Classloader | IsolationLevel::Container => {
                Err(IsolationError::Unsupported(level))
            }
        }
    }
}

#[cfg(test)]
#[path = "isolation_tests.rs"]
mod tests;
