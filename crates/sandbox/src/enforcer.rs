//! Periodic resource sampling around a running step, with cooperative-
//! then-forcible termination on the first ceiling breach.

use pk_core::{CancellationToken, ResourceLimitType, ResourceLimits, ResourceUsage, Violation};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{Pid, System};
use tokio::time::interval;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(50);
const GRACE_WINDOW: Duration = Duration::from_millis(250);
/// Warn once usage crosses this fraction of a declared ceiling.
const WARNING_THRESHOLD: f64 = 0.9;

/// What `enforce` produced: either the work's own output, or a resource
/// violation that cut it short.
pub enum EnforceOutcome<T> {
    Completed(T),
    Violated(Violation),
}

/// Drives a unit of work under the given ceilings, sampling memory, CPU,
/// wall-clock, and thread count of the current process on a fixed
/// interval.
///
/// Only one dimension's breach is ever reported per call, chosen by
/// `ResourceLimitType`'s declared tie-break order (wall, then cpu, then
/// memory, then threads) when several cross their ceiling in the same
/// sampling window.
pub struct ResourceLimitEnforcer {
    limits: ResourceLimits,
}

impl ResourceLimitEnforcer {
    pub fn new(limits: ResourceLimits) -> Self {
        Self { limits }
    }

    /// Run `work`, which receives a `CancellationToken` it should poll
    /// cooperatively, until it completes or a ceiling is breached. On
    /// breach the token is cancelled and the enforcer waits up to
    /// `GRACE_WINDOW` for cooperative shutdown before aborting the task
    /// outright.
    pub async fn enforce<F, Fut, T>(&self, work: F) -> (EnforceOutcome<T>, ResourceUsage)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(work(token.clone()));
        let abort_handle = handle.abort_handle();

        let started = Instant::now();
        let pid = Pid::from_u32(std::process::id());
        let mut system = System::new();
        let mut usage = ResourceUsage::default();
        let mut ticker = interval(SAMPLE_INTERVAL);

        let mut handle = Some(handle);
        loop {
            tokio::select! {
                biased;
                result = async {
                    match handle.as_mut() {
                        Some(h) => h.await,
                        None => std::future::pending().await,
                    }
                } => {
                    usage.wall_ms_used = started.elapsed().as_millis() as u64;
                    return match result {
                        Ok(value) => (EnforceOutcome::Completed(value), usage),
                        Err(_) => {
                            let violation = Violation::new(ResourceLimitType::ExecutionError, 1, 0);
                            usage.violations.insert(ResourceLimitType::ExecutionError);
                            (EnforceOutcome::Violated(violation), usage)
                        }
                    };
                }
                _ = ticker.tick() => {
                    self.sample(pid, &mut system, started, &mut usage);
                    if let Some(violation) = self.pick_violation(&usage) {
                        token.cancel();
                        abort_handle.abort();
                        if let Some(h) = handle.take() {
                            let _ = tokio::time::timeout(GRACE_WINDOW, h).await;
                        }
                        return (EnforceOutcome::Violated(violation), usage);
                    }
                }
            }
        }
    }

    fn sample(&self, pid: Pid, system: &mut System, started: Instant, usage: &mut ResourceUsage) {
        usage.wall_ms_used = started.elapsed().as_millis() as u64;
        system.refresh_process(pid);
        if let Some(process) = system.process(pid) {
            let memory_mb = process.memory() / (1024 * 1024);
            usage.peak_memory_mb = usage.peak_memory_mb.max(memory_mb);
            usage.cpu_ms_used = usage.cpu_ms_used.max((process.cpu_usage() as u64) * (usage.wall_ms_used / 1000).max(1));
            usage.threads_seen = usage.threads_seen.max(process.tasks().map(|t| t.len() as u32).unwrap_or(1));
        }

        self.check_dimension(
            ResourceLimitType::Wall,
            usage.wall_ms_used,
            self.limits.max_wall_ms,
            usage,
        );
        self.check_dimension(
            ResourceLimitType::Cpu,
            usage.cpu_ms_used,
            self.limits.max_cpu_ms,
            usage,
        );
        self.check_dimension(
            ResourceLimitType::Memory,
            usage.peak_memory_mb,
            self.limits.max_memory_mb,
            usage,
        );
        self.check_dimension(
            ResourceLimitType::Threads,
            usage.threads_seen as u64,
            self.limits.max_threads.map(u64::from),
            usage,
        );
    }

    fn check_dimension(
        &self,
        kind: ResourceLimitType,
        observed: u64,
        limit: Option<u64>,
        usage: &mut ResourceUsage,
    ) {
        let Some(limit) = limit else { return };
        if observed >= limit {
            usage.violations.insert(kind);
        } else if limit > 0 && (observed as f64) / (limit as f64) >= WARNING_THRESHOLD {
            usage.warnings.insert(kind);
        }
    }

    /// The highest-priority violation present in `usage`, per
    /// `ResourceLimitType`'s declared `Ord`.
    fn pick_violation(&self, usage: &ResourceUsage) -> Option<Violation> {
        let kind = *usage.violations.iter().next()?;
        let (observed, limit) = match kind {
            ResourceLimitType::Wall => (usage.wall_ms_used, self.limits.max_wall_ms.unwrap_or(0)),
            ResourceLimitType::Cpu => (usage.cpu_ms_used, self.limits.max_cpu_ms.unwrap_or(0)),
            ResourceLimitType::Memory => (usage.peak_memory_mb, self.limits.max_memory_mb.unwrap_or(0)),
            ResourceLimitType::Threads => (
                usage.threads_seen as u64,
                self.limits.max_threads.map(u64::from).unwrap_or(0),
            ),
            ResourceLimitType::ExecutionError => (1, 0),
        };
        Some(Violation::new(kind, observed, limit))
    }
}

/// Shared enforcer handle, for callers that want one enforcer driving
/// several concurrent branches under the same ceilings.
pub type SharedEnforcer = Arc<ResourceLimitEnforcer>;

#[cfg(test)]
#[path = "enforcer_tests.rs"]
mod tests;
