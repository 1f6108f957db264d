use super::*;
use indexmap::IndexMap;
use pk_core::{EnvVars, ExecutionId, StepArgs};
use std::path::PathBuf;

fn context() -> StepExecutionContext {
    StepExecutionContext::new(ExecutionId::new("exec-1"), EnvVars::new(), PathBuf::from("/tmp"))
}

#[tokio::test]
async fn execute_records_the_call_and_returns_configured_result() {
    let fake = FakeStepImpl::new("shell", SecurityLevel::Restricted)
        .with_result(StepResult::ok_with_stdout("hi"));

    let mut map = IndexMap::new();
    map.insert("command".to_string(), serde_json::Value::String("echo hi".to_string()));
    let args = StepArgs::Named(map);

    let result = fake.execute(&context(), StepArgsView::new(&args)).await.unwrap();
    assert_eq!(result.stdout, "hi");
    assert_eq!(fake.call_count(), 1);
    assert_eq!(fake.calls()[0].args, args);
}

#[tokio::test]
async fn execute_can_be_configured_to_report_failure() {
    let fake = FakeStepImpl::new("shell", SecurityLevel::Restricted)
        .with_result(StepResult::failed("boom", Some(1)));

    let args = StepArgs::default();
    let result = fake.execute(&context(), StepArgsView::new(&args)).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.stderr, "boom");
}
