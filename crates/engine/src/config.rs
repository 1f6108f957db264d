//! Engine-wide configuration: hooks the executor needs beyond the
//! workflow graph itself.

use async_trait::async_trait;
use pk_core::Status;
use std::sync::Arc;

/// Supplies the previous run's final status, for the `changed`
/// post-trigger. Production deployments back this with whatever
/// persistence layer records run history; the kernel ships only the
/// no-history default, so `changed` never fires unless a caller wires
/// one up.
#[async_trait]
pub trait PreviousStatusProvider: Send + Sync {
    async fn previous_status(&self) -> Option<Status>;
}

/// No run history is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreviousStatus;

#[async_trait]
impl PreviousStatusProvider for NoPreviousStatus {
    async fn previous_status(&self) -> Option<Status> {
        None
    }
}

/// Engine-wide configuration threaded through every `Executor`.
#[derive(Clone)]
pub struct EngineConfig {
    pub previous_status: Arc<dyn PreviousStatusProvider>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            previous_status: Arc::new(NoPreviousStatus),
        }
    }
}
