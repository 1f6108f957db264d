//! Validates a workflow's declared resources and isolation level against
//! the operator's configured policy ceilings before a run is allowed to
//! start.

use pk_core::{IsolationLevel, PolicyIssue, PolicyValidation, Workflow};

/// The ceilings a policy allows a workflow to request. `None` in any
/// field means that dimension has no policy ceiling (any workflow value
/// is accepted).
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyCeiling {
    pub max_memory_mb: Option<u64>,
    pub max_cpu_ms: Option<u64>,
    pub max_wall_ms: Option<u64>,
    pub max_threads: Option<u32>,
    pub min_isolation: Option<IsolationLevel>,
}

/// Checks a workflow's requested resources and isolation level against a
/// `PolicyCeiling` before the engine commits to running it.
pub struct SandboxManager {
    ceiling: PolicyCeiling,
}

impl PolicyCeiling {
    /// The kernel's out-of-the-box ceilings (memory 4096 MB, CPU 300 s,
    /// wall 1800 s, threads 50), used when the operator supplies no
    /// override at engine startup.
    pub fn standard() -> Self {
        Self {
            max_memory_mb: Some(4096),
            max_cpu_ms: Some(300_000),
            max_wall_ms: Some(1_800_000),
            max_threads: Some(50),
            min_isolation: None,
        }
    }
}

impl SandboxManager {
    pub fn new(ceiling: PolicyCeiling) -> Self {
        Self { ceiling }
    }

    pub fn validate(&self, workflow: &Workflow) -> PolicyValidation {
        let mut validation = PolicyValidation::ok();
        self.check_limit(
            "$.resource_limits.max_memory_mb",
            workflow.resource_limits.max_memory_mb,
            self.ceiling.max_memory_mb,
            &mut validation,
        );
        self.check_limit(
            "$.resource_limits.max_cpu_ms",
            workflow.resource_limits.max_cpu_ms,
            self.ceiling.max_cpu_ms,
            &mut validation,
        );
        self.check_limit(
            "$.resource_limits.max_wall_ms",
            workflow.resource_limits.max_wall_ms,
            self.ceiling.max_wall_ms,
            &mut validation,
        );
        self.check_limit(
            "$.resource_limits.max_threads",
            workflow.resource_limits.max_threads.map(u64::from),
            self.ceiling.max_threads.map(u64::from),
            &mut validation,
        );

        if let Some(min) = self.ceiling.min_isolation {
            if isolation_rank(workflow.isolation_level) < isolation_rank(min) {
                validation.push(PolicyIssue::new(
                    "$.isolation_level",
                    format!(
                        "isolation level {:?} is weaker than the policy minimum {min:?}",
                        workflow.isolation_level
                    ),
                ));
            }
        }

        validation
    }

    fn check_limit(
        &self,
        path: &str,
        requested: Option<u64>,
        ceiling: Option<u64>,
        validation: &mut PolicyValidation,
    ) {
        let (Some(requested), Some(ceiling)) = (requested, ceiling) else {
            return;
        };
        if requested > ceiling {
            validation.push(PolicyIssue::new(
                path,
                format!("requested {requested} exceeds policy ceiling {ceiling}"),
            ));
        }
    }
}

/// `None` is the weakest isolation, `Container` the strongest.
fn isolation_rank(level: IsolationLevel) -> u8 {
    match level {
        IsolationLevel::None => 0,
        IsolationLevel::Thread => 1,
        IsolationLevel::Classloader => 2,
        IsolationLevel::Process => 3,
        IsolationLevel::Container => 4,
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
