//! S6 — Policy rejection: a workflow requesting resources above the
//! configured ceiling is rejected before any step runs, with the
//! definition/validation exit code and no step output.

use crate::prelude::Project;

#[test]
fn resource_requests_above_the_policy_ceiling_are_rejected_before_running() {
    let project = Project::with_pipeline(
        r#"
resource_limits:
  max_memory_mb: 10000
  max_threads: 100
stages:
  - name: build
    steps:
      - kind: echo
        message: "should never print"
"#,
    );

    let output = project.run_cmd().output().expect("pk run");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("should never print"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_memory_mb"));
    assert!(stderr.contains("max_threads"));
}
