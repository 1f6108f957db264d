//! S4 — Wall-clock violation: a step that sleeps past its wall ceiling
//! is cut off and reported as a resource violation, not left running.

use crate::prelude::Project;
use std::time::Instant;

#[test]
fn a_tight_wall_ceiling_cuts_a_long_sleep_short() {
    let project = Project::with_pipeline(
        r#"
resource_limits:
  max_wall_ms: 200
stages:
  - name: s
    steps:
      - kind: delay
        ms: 2000
"#,
    );

    let started = Instant::now();
    let output = project.run_cmd().output().expect("pk run");
    assert!(started.elapsed().as_secs() < 2);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stage s: Failure"));
}
