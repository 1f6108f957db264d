use super::*;
use indexmap::IndexMap;
use pk_core::{
    Agent, EnvVars, ExecutionId, KernelError, ParallelFailureMode, PostBlock, ResourceLimits,
    ReturnStdout, Stage, StepResult,
};
use pk_registry::{Category, FakeStepImpl, SecurityLevel};
use pk_sandbox::ProcessIsolationBinder;
use std::sync::Arc;
use std::time::Duration;

fn workflow(stages: Vec<Stage>) -> Workflow {
    Workflow {
        agent: Agent::Inline,
        global_env: EnvVars::new(),
        stages,
        post: PostBlock::new(),
        isolation_level: IsolationLevel::Thread,
        resource_limits: ResourceLimits::unbounded(),
    }
}

fn engine(registry: Registry) -> Executor<ProcessIsolationBinder> {
    Executor::new(Arc::new(registry), Arc::new(ProcessIsolationBinder), EngineConfig::default())
}

async fn run(executor: &Executor<ProcessIsolationBinder>, workflow: &Workflow) -> WorkflowReport {
    let tmp = tempfile::tempdir().expect("tempdir");
    executor
        .run_workflow(
            workflow,
            ExecutionId::new("test-run"),
            tmp.path().to_path_buf(),
            CancellationToken::new(),
            CancellationReason::UserAbort,
        )
        .await
}

#[tokio::test(flavor = "multi_thread")]
async fn sequential_steps_succeed_in_order() {
    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let executor = engine(registry);

    let wf = workflow(vec![Stage::new(
        "build",
        vec![
            Step::Echo { message: "one".to_string() },
            Step::Echo { message: "two".to_string() },
        ],
    )]);

    let report = run(&executor, &wf).await;
    assert_eq!(report.status, Status::Success);
    assert_eq!(report.stages[0].status, Status::Success);
    assert_eq!(report.stages[0].steps.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn retry_exhausts_every_attempt_against_a_permanently_failing_step() {
    let mut registry = Registry::new();
    let fake = Arc::new(FakeStepImpl::new("flaky", SecurityLevel::Trusted).with_result(StepResult::failed("boom", Some(1))));
    registry.register(fake.clone());
    let executor = engine(registry);

    let wf = workflow(vec![Stage::new(
        "build",
        vec![Step::Retry {
            attempts: 3,
            steps: vec![Step::UserDefined {
                name: "flaky".to_string(),
                args: StepArgs::default(),
                return_stdout: ReturnStdout(false),
            }],
            backoff_ms: 0,
        }],
    )]);

    let report = run(&executor, &wf).await;
    assert_eq!(fake.call_count(), 3);
    assert_eq!(report.status, Status::Failure);
}

#[tokio::test(flavor = "multi_thread")]
async fn env_vars_expand_into_step_arguments() {
    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let executor = engine(registry);

    let mut env = EnvVars::new();
    env.set("DB", "mydb");
    let mut wf = workflow(vec![Stage::new(
        "build",
        vec![Step::Echo { message: "${DB}".to_string() }],
    )]);
    wf.global_env = env;

    let report = run(&executor, &wf).await;
    assert_eq!(report.status, Status::Success);
    let result = report.stages[0].steps[0].result.as_ref().expect("step result");
    assert_eq!(result.stdout, "mydb");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_zero_wall_ceiling_violates_on_the_first_sample() {
    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let executor = engine(registry);

    let mut wf = workflow(vec![Stage::new("build", vec![Step::Delay { ms: 300 }])]);
    wf.resource_limits = ResourceLimits {
        max_wall_ms: Some(0),
        ..ResourceLimits::unbounded()
    };

    let report = run(&executor, &wf).await;
    assert_eq!(report.status, Status::Failure);
    let outcome = &report.stages[0].steps[0];
    match &outcome.error {
        Some(KernelError::ResourceViolation { violation }) => {
            assert_eq!(violation.kind, pk_core::ResourceLimitType::Wall);
        }
        other => panic!("expected a resource violation, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn a_tight_wall_ceiling_cuts_off_a_long_running_step() {
    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let executor = engine(registry);

    let mut wf = workflow(vec![Stage::new("build", vec![Step::Delay { ms: 2000 }])]);
    wf.resource_limits = ResourceLimits {
        max_wall_ms: Some(100),
        ..ResourceLimits::unbounded()
    };

    let started = std::time::Instant::now();
    let report = run(&executor, &wf).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(report.status, Status::Failure);
}

#[tokio::test(flavor = "multi_thread")]
async fn fail_fast_parallel_cancels_the_slower_sibling() {
    let mut registry = Registry::new();
    pk_steps::register_builtin_steps(&mut registry);
    let failing = Arc::new(FakeStepImpl::new("failer", SecurityLevel::Trusted).with_result(StepResult::failed("nope", Some(1))));
    registry.register(failing);
    let executor = engine(registry);

    let mut branches = IndexMap::new();
    branches.insert("slow".to_string(), vec![Step::Delay { ms: 2000 }]);
    branches.insert(
        "fast".to_string(),
        vec![Step::UserDefined {
            name: "failer".to_string(),
            args: StepArgs::default(),
            return_stdout: ReturnStdout(false),
        }],
    );

    let wf = workflow(vec![Stage::new(
        "build",
        vec![Step::Parallel { branches, fail_fast: ParallelFailureMode::FailFast }],
    )]);

    let started = std::time::Instant::now();
    let report = run(&executor, &wf).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(report.status, Status::Failure);

    let parallel_node = &report.stages[0].steps[0];
    let slow_branch = parallel_node.children.iter().find(|c| c.name == "slow").expect("slow branch");
    assert_eq!(slow_branch.status, Status::Aborted);
}
