//! Walks a compiled workflow's stages and steps, dispatching leaves
//! through the step registry under resource enforcement and isolation
//! binding, and firing post-hooks as each scope settles.

use crate::config::EngineConfig;
use crate::post::{matching_triggers, trigger_name};
use crate::report::{StageReport, StepOutcome, WorkflowReport};
use crate::status::{downgrade_for_post_failure, rollup_stage, rollup_workflow};
use pk_core::{
    CancellationReason, CancellationToken, ExecutionId, IsolationLevel, KernelError,
    ParallelFailureMode, PostBlock, Stage, Status, Step, StepArgs, StepArgsView,
    StepExecutionContext, Workflow,
};
use pk_registry::{InvocationRecorder, Registry};
use pk_sandbox::{EnforceOutcome, IsolationBinder, IsolationError, ResourceLimitEnforcer, SharedEnforcer};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinSet;

/// An `execute_step` call recurses through `execute_parallel` and
/// `execute_retry`, both of which re-enter `execute_sequence` and so
/// `execute_step` again; boxing breaks the otherwise-infinite future
/// type that recursion would produce.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The two ways a leaf dispatch can fail short of a declared resource
/// violation: the step implementation itself raised, or the requested
/// isolation level could not be bound.
enum LeafError {
    Step(anyhow::Error),
    Isolation(IsolationError),
}

/// Per-run state threaded through every step dispatch: the enforcer
/// built from the workflow's declared ceilings, and the isolation level
/// every leaf binds at.
#[derive(Clone)]
struct RunState {
    enforcer: SharedEnforcer,
    isolation_level: IsolationLevel,
}

/// Runs workflows against a step registry, under a given isolation
/// binder. Generic over `B` rather than `Arc<dyn IsolationBinder>`
/// because `IsolationBinder::bind` is generic over its own work
/// closure, which isn't object-safe.
pub struct Executor<B: IsolationBinder> {
    registry: Arc<Registry>,
    binder: Arc<B>,
    recorder: Arc<InvocationRecorder>,
    config: EngineConfig,
}

impl<B: IsolationBinder> Clone for Executor<B> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            binder: Arc::clone(&self.binder),
            recorder: Arc::clone(&self.recorder),
            config: self.config.clone(),
        }
    }
}

impl<B: IsolationBinder + 'static> Executor<B> {
    pub fn new(registry: Arc<Registry>, binder: Arc<B>, config: EngineConfig) -> Self {
        Self {
            registry,
            binder,
            recorder: Arc::new(InvocationRecorder::new()),
            config,
        }
    }

    /// The invocation log for every step this executor has dispatched.
    pub fn recorder(&self) -> &Arc<InvocationRecorder> {
        &self.recorder
    }

    /// Run a whole workflow to completion and produce its report.
    /// `cancellation` lets a caller (a signal handler, a `--timeout`
    /// watchdog) abort the run from outside; `cancel_reason` is what
    /// every step cut short by that token reports as its cause.
    pub async fn run_workflow(
        &self,
        workflow: &Workflow,
        execution_id: ExecutionId,
        working_dir: PathBuf,
        cancellation: CancellationToken,
        cancel_reason: CancellationReason,
    ) -> WorkflowReport {
        let run = RunState {
            enforcer: Arc::new(ResourceLimitEnforcer::new(workflow.resource_limits)),
            isolation_level: workflow.isolation_level,
        };
        let ctx = StepExecutionContext::new(execution_id, workflow.global_env.clone(), working_dir)
            .with_cancellation(cancellation.clone());

        let mut stage_reports = Vec::with_capacity(workflow.stages.len());
        for stage in &workflow.stages {
            stage_reports.push(self.run_stage(stage, &ctx, &run, cancel_reason).await);
        }

        let stage_statuses: Vec<Status> = stage_reports.iter().map(|s| s.status).collect();
        let workflow_status = rollup_workflow(&stage_statuses, cancellation.is_cancelled());

        let previous = self.config.previous_status.previous_status().await;
        let post = self
            .fire_post(&workflow.post, workflow_status, previous, &ctx, &run, cancel_reason)
            .await;
        let any_post_failed = post.iter().any(|o| o.status != Status::Success);
        let status = downgrade_for_post_failure(workflow_status, any_post_failed);

        WorkflowReport {
            status,
            stages: stage_reports,
            post,
        }
    }

    async fn run_stage(
        &self,
        stage: &Stage,
        ctx: &StepExecutionContext,
        run: &RunState,
        cancel_reason: CancellationReason,
    ) -> StageReport {
        let already_cancelled = ctx.cancellation.is_cancelled();
        let steps = if already_cancelled {
            Vec::new()
        } else {
            self.execute_sequence(&stage.steps, ctx, run, cancel_reason).await
        };

        let step_statuses: Vec<Status> = steps.iter().map(|o| o.status).collect();
        let mut status = if already_cancelled && steps.is_empty() {
            Status::Aborted
        } else {
            rollup_stage(&step_statuses)
        };

        let post = self.fire_post(&stage.post, status, None, ctx, run, cancel_reason).await;
        let any_post_failed = post.iter().any(|o| o.status != Status::Success);
        status = downgrade_for_post_failure(status, any_post_failed);

        StageReport {
            name: stage.name.clone(),
            status,
            steps,
            post,
        }
    }

    /// Run every declared trigger whose condition the finished `status`
    /// satisfies, `always` last, and report each as its own group.
    async fn fire_post(
        &self,
        post_block: &PostBlock,
        status: Status,
        previous: Option<Status>,
        ctx: &StepExecutionContext,
        run: &RunState,
        cancel_reason: CancellationReason,
    ) -> Vec<StepOutcome> {
        if post_block.is_empty() {
            return Vec::new();
        }
        let mut groups = Vec::new();
        for trigger in matching_triggers(status, previous) {
            let Some(steps) = post_block.get(trigger) else {
                continue;
            };
            let outcomes = self.execute_sequence(steps, ctx, run, cancel_reason).await;
            let group_status = rollup_stage(&outcomes.iter().map(|o| o.status).collect::<Vec<_>>());
            groups.push(StepOutcome::group(format!("post:{}", trigger_name(trigger)), group_status, outcomes));
        }
        groups
    }

    /// Run a sequence of steps in order, stopping at the first step
    /// that doesn't succeed.
    async fn execute_sequence(
        &self,
        steps: &[Step],
        ctx: &StepExecutionContext,
        run: &RunState,
        cancel_reason: CancellationReason,
    ) -> Vec<StepOutcome> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for step in steps {
            let outcome = self.execute_step(step, ctx, run, cancel_reason).await;
            let succeeded = outcome.status == Status::Success;
            outcomes.push(outcome);
            if !succeeded {
                break;
            }
        }
        outcomes
    }

    fn execute_step<'a>(
        &'a self,
        step: &'a Step,
        ctx: &'a StepExecutionContext,
        run: &'a RunState,
        cancel_reason: CancellationReason,
    ) -> BoxFuture<'a, StepOutcome> {
        Box::pin(async move {
            match step {
                Step::Parallel { branches, fail_fast } => {
                    self.execute_parallel(branches, *fail_fast, ctx, run).await
                }
                Step::Retry { attempts, steps, backoff_ms } => {
                    self.execute_retry(*attempts, steps, *backoff_ms, ctx, run, cancel_reason).await
                }
                _ => self.execute_leaf(step, ctx, run, cancel_reason).await,
            }
        })
    }

    /// Fan the named branches out onto their own tasks. In fail-fast
    /// mode the first branch to actually fail cancels the rest; a
    /// branch cut short this way reports `Cancellation{ParentFailure}`
    /// regardless of what its own in-flight step was doing.
    async fn execute_parallel(
        &self,
        branches: &indexmap::IndexMap<String, Vec<Step>>,
        fail_fast: ParallelFailureMode,
        ctx: &StepExecutionContext,
        run: &RunState,
    ) -> StepOutcome {
        let local_token = CancellationToken::new();
        let parent_token = ctx.cancellation.clone();
        let forwarded = local_token.clone();
        let forward_handle = tokio::spawn(async move {
            parent_token.cancelled().await;
            forwarded.cancel();
        });

        let branch_ctx = ctx.clone().with_cancellation(local_token.clone());

        let mut join_set = JoinSet::new();
        for (branch_name, steps) in branches {
            let executor = self.clone();
            let run = run.clone();
            let branch_ctx = branch_ctx.clone();
            let branch_name = branch_name.clone();
            let steps = steps.clone();
            join_set.spawn(async move {
                let outcomes = executor
                    .execute_sequence(&steps, &branch_ctx, &run, CancellationReason::ParentFailure)
                    .await;
                (branch_name, outcomes)
            });
        }

        let mut entries: Vec<(String, Status, Vec<StepOutcome>)> = Vec::new();
        let mut saw_failure = false;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((branch_name, outcomes)) => {
                    let status = rollup_stage(&outcomes.iter().map(|o| o.status).collect::<Vec<_>>());
                    if status == Status::Failure && fail_fast == ParallelFailureMode::FailFast && !saw_failure {
                        saw_failure = true;
                        local_token.cancel();
                    }
                    entries.push((branch_name, status, outcomes));
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "parallel branch task panicked");
                }
            }
        }
        forward_handle.abort();

        let statuses: Vec<Status> = entries.iter().map(|(_, s, _)| *s).collect();
        let overall = rollup_stage(&statuses);
        let children = entries
            .into_iter()
            .map(|(name, status, outcomes)| StepOutcome::group(name, status, outcomes))
            .collect();
        StepOutcome::group("parallel", overall, children)
    }

    /// Re-run the inner step sequence until it succeeds or `attempts`
    /// is exhausted, waiting `backoff_ms` between attempts.
    async fn execute_retry(
        &self,
        attempts: u32,
        steps: &[Step],
        backoff_ms: u64,
        ctx: &StepExecutionContext,
        run: &RunState,
        cancel_reason: CancellationReason,
    ) -> StepOutcome {
        let attempts = attempts.max(1);
        let mut children = Vec::new();

        for attempt in 1..=attempts {
            if ctx.cancellation.is_cancelled() {
                break;
            }
            let outcomes = self.execute_sequence(steps, ctx, run, cancel_reason).await;
            let status = rollup_stage(&outcomes.iter().map(|o| o.status).collect::<Vec<_>>());
            let succeeded = status == Status::Success;
            children.push(StepOutcome::group(format!("attempt-{attempt}"), status, outcomes));
            if succeeded {
                break;
            }
            if attempt < attempts && backoff_ms > 0 {
                tokio::select! {
                    () = tokio::time::sleep(std::time::Duration::from_millis(backoff_ms)) => {}
                    () = ctx.cancellation.cancelled() => {}
                }
            }
        }

        let status = children.last().map_or(Status::Aborted, |c| c.status);
        StepOutcome::group("retry", status, children)
    }

    /// Dispatch one leaf step: look it up, bind its isolation level,
    /// run it under resource enforcement, and classify the outcome.
    async fn execute_leaf(
        &self,
        step: &Step,
        ctx: &StepExecutionContext,
        run: &RunState,
        cancel_reason: CancellationReason,
    ) -> StepOutcome {
        let name = step.dispatch_name().to_string();
        let args = build_args(step);

        let step_impl = match self.registry.lookup(&name) {
            Ok(step_impl) => step_impl,
            Err(_) => {
                let error = KernelError::UnresolvedStep { name: name.clone() };
                tracing::warn!(step = %name, "unresolved step");
                return StepOutcome::leaf(name, Status::Failure, None, Default::default(), Some(error));
            }
        };

        let sequence = self.recorder.begin(ctx.execution_id.clone(), name.clone(), args.clone());

        let binder = Arc::clone(&self.binder);
        let level = run.isolation_level;
        let exec_ctx = ctx.clone();
        let leaf_args = args.clone();

        let (outcome, usage) = run
            .enforcer
            .enforce(move |cancellation| {
                let exec_ctx = exec_ctx.with_cancellation(cancellation);
                async move {
                    let bound = binder
                        .bind(level, move || async move {
                            step_impl.execute(&exec_ctx, StepArgsView::new(&leaf_args)).await
                        })
                        .await;
                    match bound {
                        Ok(result) => result.map_err(LeafError::Step),
                        Err(e) => Err(LeafError::Isolation(e)),
                    }
                }
            })
            .await;

        let (mut status, result, mut error) = match outcome {
            EnforceOutcome::Completed(Ok(step_result)) => {
                let success = step_result.success;
                self.recorder.finish(sequence, step_result.clone());
                let error = if success {
                    None
                } else {
                    Some(KernelError::StepExecution {
                        step_name: name.clone(),
                        message: step_result.stderr.clone(),
                        exit_code: step_result.exit_code,
                    })
                };
                let status = if success { Status::Success } else { Status::Failure };
                (status, Some(step_result), error)
            }
            EnforceOutcome::Completed(Err(LeafError::Step(source))) => {
                let error = KernelError::StepExecution {
                    step_name: name.clone(),
                    message: source.to_string(),
                    exit_code: None,
                };
                (Status::Failure, None, Some(error))
            }
            EnforceOutcome::Completed(Err(LeafError::Isolation(source))) => {
                let error = KernelError::Isolation {
                    level: format!("{level:?}"),
                    message: source.to_string(),
                };
                (Status::Failure, None, Some(error))
            }
            EnforceOutcome::Violated(violation) => {
                let error = KernelError::ResourceViolation { violation };
                (Status::Failure, None, Some(error))
            }
        };

        if ctx.cancellation.is_cancelled() {
            status = Status::Aborted;
            error = Some(KernelError::Cancellation { reason: cancel_reason });
        }

        StepOutcome::leaf(name, status, result, usage, error)
    }
}

/// Map a step's own fields onto the named-argument shape its `StepImpl`
/// expects. `Parallel`/`Retry` never reach this: the executor
/// interprets them structurally and never looks them up in the
/// registry.
fn build_args(step: &Step) -> StepArgs {
    let mut map = indexmap::IndexMap::new();
    match step {
        Step::Shell { command, return_stdout } => {
            map.insert("command".to_string(), serde_json::json!(command));
            map.insert("return_stdout".to_string(), serde_json::json!(return_stdout.0));
        }
        Step::Echo { message } => {
            map.insert("message".to_string(), serde_json::json!(message));
        }
        Step::ReadFile { path, return_stdout } => {
            map.insert("path".to_string(), serde_json::json!(path));
            map.insert("return_stdout".to_string(), serde_json::json!(return_stdout.0));
        }
        Step::WriteFile { path, content } => {
            map.insert("path".to_string(), serde_json::json!(path));
            map.insert("content".to_string(), serde_json::json!(content));
        }
        Step::Delay { ms } => {
            map.insert("ms".to_string(), serde_json::json!(ms));
        }
        Step::Checkout { url, branch } => {
            map.insert("url".to_string(), serde_json::json!(url));
            if let Some(branch) = branch {
                map.insert("branch".to_string(), serde_json::json!(branch));
            }
        }
        Step::ArchiveArtifacts { glob } => {
            map.insert("glob".to_string(), serde_json::json!(glob));
        }
        Step::UserDefined { args, .. } => return args.clone(),
        Step::Parallel { .. } | Step::Retry { .. } => {}
    }
    StepArgs::Named(map)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
