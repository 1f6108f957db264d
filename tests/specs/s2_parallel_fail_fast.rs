//! S2 — Parallel fail-fast: one branch fails, the slower sibling is
//! cancelled rather than left to finish, and the workflow reports
//! Failure (not Aborted) since a real failure caused the cancellation.

use crate::prelude::Project;
use std::time::Instant;

#[test]
fn a_failing_branch_cancels_its_slower_sibling() {
    let project = Project::with_pipeline(
        r#"
stages:
  - name: p
    steps:
      - kind: parallel
        branches:
          a:
            - kind: delay
              ms: 2000
            - kind: echo
              message: "a finished"
          b:
            - kind: sh
              command: "exit 1"
"#,
    );

    let started = Instant::now();
    let output = project.run_cmd().output().expect("pk run");
    assert!(started.elapsed().as_secs() < 2, "fail-fast should cut the 2s branch short");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("workflow: Failure"));
}
