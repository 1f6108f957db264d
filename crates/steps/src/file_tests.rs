use super::*;
use pk_core::{EnvVars, ExecutionId, IdGen, SequentialIdGen};
use serde_json::json;
use tempfile::tempdir;

fn context(working_dir: std::path::PathBuf) -> StepExecutionContext {
    let id = ExecutionId::new(SequentialIdGen::default().next());
    StepExecutionContext::new(id, EnvVars::new(), working_dir)
}

fn named_args(pairs: &[(&str, serde_json::Value)]) -> pk_core::StepArgs {
    let mut map = indexmap::IndexMap::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    pk_core::StepArgs::Named(map)
}

#[tokio::test]
async fn write_then_read_round_trips_content() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path().to_path_buf());

    let write_args = named_args(&[("path", json!("out.txt")), ("content", json!("payload"))]);
    let written = WriteFileStep.execute(&ctx, StepArgsView::new(&write_args)).await.unwrap();
    assert!(written.success);

    let read_args = named_args(&[("path", json!("out.txt")), ("return_stdout", json!(true))]);
    let read = ReadFileStep.execute(&ctx, StepArgsView::new(&read_args)).await.unwrap();
    assert_eq!(read.stdout, "payload");
}

#[tokio::test]
async fn read_file_missing_path_is_an_error() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path().to_path_buf());
    let args = named_args(&[("path", json!("missing.txt"))]);
    assert!(ReadFileStep.execute(&ctx, StepArgsView::new(&args)).await.is_err());
}

#[tokio::test]
async fn write_file_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path().to_path_buf());
    let args = named_args(&[("path", json!("nested/out.txt")), ("content", json!("x"))]);
    let result = WriteFileStep.execute(&ctx, StepArgsView::new(&args)).await.unwrap();
    assert!(result.success);
    assert!(dir.path().join("nested/out.txt").exists());
}
