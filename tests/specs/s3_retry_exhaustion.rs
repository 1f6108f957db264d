//! S3 — Retry exhaustion: a step that always fails runs every declared
//! attempt and the stage reports Failure.

use crate::prelude::Project;

#[test]
fn a_permanently_failing_step_runs_every_attempt_then_fails() {
    let project = Project::with_pipeline(
        r#"
stages:
  - name: r
    steps:
      - kind: retry
        attempts: 3
        steps:
          - kind: sh
            command: "exit 1"
"#,
    );

    let output = project.run_cmd().output().expect("pk run");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stage r: Failure"));
}
