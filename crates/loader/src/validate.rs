//! Semantic validation of a deserialized `Workflow`, per spec §4.1.
//! Fails fast on the first problem found, walking the graph in
//! declaration order so the reported path is the first offender a
//! human reading the source top-to-bottom would hit.

use pk_core::{KernelError, Stage, Step, Workflow};
use std::collections::HashSet;

pub fn validate_workflow(workflow: &Workflow) -> Result<(), KernelError> {
    if workflow.stages.is_empty() {
        return Err(KernelError::Definition {
            path: "stages".to_string(),
            message: "a workflow must declare at least one stage".to_string(),
        });
    }

    let mut seen_stage_names = HashSet::new();
    for (i, stage) in workflow.stages.iter().enumerate() {
        let path = format!("stages[{i}]");
        if !seen_stage_names.insert(stage.name.as_str()) {
            return Err(KernelError::Definition {
                path,
                message: format!("duplicate stage name {:?}", stage.name),
            });
        }
        validate_stage(stage, &path)?;
    }

    for (name, _value) in workflow.global_env.iter() {
        validate_env_key(name, &format!("environment.{name}"))?;
    }

    Ok(())
}

fn validate_stage(stage: &Stage, path: &str) -> Result<(), KernelError> {
    if stage.steps.is_empty() {
        return Err(KernelError::Definition {
            path: format!("{path}.steps"),
            message: format!("stage {:?} must have at least one step", stage.name),
        });
    }
    for (i, step) in stage.steps.iter().enumerate() {
        validate_step(step, &format!("{path}.steps[{i}]"))?;
    }
    Ok(())
}

fn validate_step(step: &Step, path: &str) -> Result<(), KernelError> {
    match step {
        Step::Parallel { branches, .. } => {
            if branches.is_empty() {
                return Err(KernelError::Definition {
                    path: format!("{path}.parallel.branches"),
                    message: "a parallel step must declare at least one branch".to_string(),
                });
            }
            for (name, steps) in branches {
                let branch_path = format!("{path}.parallel.branches.{name}");
                if steps.is_empty() {
                    return Err(KernelError::Definition {
                        path: branch_path,
                        message: format!("branch {name:?} must have at least one step"),
                    });
                }
                for (i, inner) in steps.iter().enumerate() {
                    validate_step(inner, &format!("{branch_path}[{i}]"))?;
                }
            }
            Ok(())
        }
        Step::Retry { attempts, steps, .. } => {
            if *attempts < 1 {
                return Err(KernelError::Definition {
                    path: format!("{path}.retry.attempts"),
                    message: "retry attempts must be >= 1".to_string(),
                });
            }
            if steps.is_empty() {
                return Err(KernelError::Definition {
                    path: format!("{path}.retry.steps"),
                    message: "a retry step must wrap at least one inner step".to_string(),
                });
            }
            for (i, inner) in steps.iter().enumerate() {
                validate_step(inner, &format!("{path}.retry.steps[{i}]"))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, checked by hand since the workspace has no
/// other use for a regex dependency.
fn validate_env_key(name: &str, path: &str) -> Result<(), KernelError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(KernelError::Definition {
            path: path.to_string(),
            message: format!("environment key {name:?} must match [A-Za-z_][A-Za-z0-9_]*"),
        })
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
