//! Resource ceilings, running usage counters, and isolation strategy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declared ceilings for a single step or stage execution. A `None` field
/// means unbounded for that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub max_memory_mb: Option<u64>,
    pub max_cpu_ms: Option<u64>,
    pub max_wall_ms: Option<u64>,
    pub max_threads: Option<u32>,
}

impl ResourceLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// The dimension along which a resource ceiling was breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceLimitType {
    /// Wall-clock takes precedence over CPU over memory over threads when
    /// several limits fire within the same sampling window (see
    /// `ResourceLimitEnforcer`'s tie-break rule) — the derived `Ord`
    /// relies on this declaration order.
    Wall,
    Cpu,
    Memory,
    Threads,
    /// The monitored work raised an exception/error rather than breaching
    /// a declared ceiling.
    ExecutionError,
}

/// Running counters sampled periodically while a step or stage is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub peak_memory_mb: u64,
    pub cpu_ms_used: u64,
    pub wall_ms_used: u64,
    pub threads_seen: u32,
    pub violations: BTreeSet<ResourceLimitType>,
    /// Dimensions that crossed the warning threshold (>90% of ceiling)
    /// without actually breaching it.
    pub warnings: BTreeSet<ResourceLimitType>,
}

impl ResourceUsage {
    pub fn has_violation(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// A single observed breach of a declared ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ResourceLimitType,
    pub observed: u64,
    pub limit: u64,
}

impl Violation {
    pub fn new(kind: ResourceLimitType, observed: u64, limit: u64) -> Self {
        Self {
            kind,
            observed,
            limit,
        }
    }
}

/// The binding strategy wrapping a step call, from no isolation at all up
/// to a managed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Direct call in the current task; cooperative cancel only.
    None,
    /// Dedicated worker task on the bounded pool.
    Thread,
    /// Fresh class-resolution scope shadowing globals for the duration.
    Classloader,
    /// Spawned child process; stdio streamed, env/args passed through.
    Process,
    /// Managed container with the stated limits applied by the runtime.
    Container,
}

impl Default for IsolationLevel {
    fn default() -> Self {
        IsolationLevel::Thread
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
