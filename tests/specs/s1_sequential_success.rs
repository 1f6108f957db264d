//! S1 — Sequential Success: two stages that both succeed exit 0 and
//! run their steps in declaration order.

use crate::prelude::Project;

#[test]
fn two_succeeding_stages_exit_zero_in_order() {
    let project = Project::with_pipeline(
        r#"
stages:
  - name: a
    steps:
      - kind: echo
        message: hello
  - name: b
    steps:
      - kind: sh
        command: "exit 0"
"#,
    );

    let output = project.run_cmd().output().expect("pk run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stage a: Success"));
    assert!(stdout.contains("stage b: Success"));
    assert!(stdout.contains("workflow: Success"));
}
