use super::*;
use pk_core::{Agent, EnvVars, PostBlock, ResourceLimits, Stage, Step};

fn workflow(limits: ResourceLimits, isolation: IsolationLevel) -> Workflow {
    Workflow {
        agent: Agent::Inline,
        global_env: EnvVars::new(),
        stages: vec![Stage::new(
            "build",
            vec![Step::Echo { message: "hi".to_string() }],
        )],
        post: PostBlock::new(),
        isolation_level: isolation,
        resource_limits: limits,
    }
}

#[test]
fn accepts_a_workflow_within_every_ceiling() {
    let manager = SandboxManager::new(PolicyCeiling {
        max_memory_mb: Some(512),
        max_cpu_ms: Some(60_000),
        max_wall_ms: Some(120_000),
        max_threads: Some(8),
        min_isolation: None,
    });

    let wf = workflow(
        ResourceLimits {
            max_memory_mb: Some(256),
            max_cpu_ms: Some(30_000),
            max_wall_ms: Some(60_000),
            max_threads: Some(4),
        },
        IsolationLevel::Thread,
    );

    assert!(manager.validate(&wf).is_valid());
}

#[test]
fn rejects_a_workflow_that_exceeds_a_ceiling() {
    let manager = SandboxManager::new(PolicyCeiling {
        max_memory_mb: Some(128),
        ..PolicyCeiling::default()
    });

    let wf = workflow(
        ResourceLimits {
            max_memory_mb: Some(512),
            ..ResourceLimits::unbounded()
        },
        IsolationLevel::Thread,
    );

    let validation = manager.validate(&wf);
    assert!(!validation.is_valid());
    assert_eq!(validation.issues[0].path, "$.resource_limits.max_memory_mb");
}

#[test]
fn rejects_isolation_weaker_than_the_policy_minimum() {
    let manager = SandboxManager::new(PolicyCeiling {
        min_isolation: Some(IsolationLevel::Process),
        ..PolicyCeiling::default()
    });

    let wf = workflow(ResourceLimits::unbounded(), IsolationLevel::None);
    let validation = manager.validate(&wf);
    assert!(!validation.is_valid());
    assert_eq!(validation.issues[0].path, "$.isolation_level");
}

#[test]
fn standard_ceiling_matches_the_documented_defaults() {
    let ceiling = PolicyCeiling::standard();
    assert_eq!(ceiling.max_memory_mb, Some(4096));
    assert_eq!(ceiling.max_cpu_ms, Some(300_000));
    assert_eq!(ceiling.max_wall_ms, Some(1_800_000));
    assert_eq!(ceiling.max_threads, Some(50));
}

#[test]
fn absent_policy_ceiling_permits_any_requested_value() {
    let manager = SandboxManager::new(PolicyCeiling::default());
    let wf = workflow(
        ResourceLimits {
            max_memory_mb: Some(u64::MAX),
            ..ResourceLimits::unbounded()
        },
        IsolationLevel::Container,
    );
    assert!(manager.validate(&wf).is_valid());
}
