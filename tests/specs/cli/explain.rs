//! `pk explain` resolves a source position through the source map and
//! renders the diagnostic at that location.

use crate::prelude::Project;

#[test]
fn explaining_a_malformed_pipeline_renders_a_diagnostic() {
    let project = Project::with_pipeline("stages: [");
    let output = project.explain_cmd("1", "0").output().expect("pk explain");
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PK001") || stdout.contains("error"));
}
