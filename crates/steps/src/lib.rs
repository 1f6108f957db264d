// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Built-in step implementations for the pipeline execution kernel:
//! `sh`, `echo`, `readFile`, `writeFile`, `delay`, `checkout`, and
//! `archiveArtifacts`. `parallel` and `retry` are structural constructs
//! the engine interprets directly and have no `StepImpl` here.

pub mod archive;
pub mod checkout;
pub mod delay;
pub mod echo;
pub mod file;
pub mod shell;

use pk_registry::Registry;
use std::sync::Arc;

/// Register every built-in step under its dispatch name.
pub fn register_builtin_steps(registry: &mut Registry) {
    registry.register(Arc::new(shell::ShellStep));
    registry.register(Arc::new(echo::EchoStep));
    registry.register(Arc::new(file::ReadFileStep));
    registry.register(Arc::new(file::WriteFileStep));
    registry.register(Arc::new(delay::DelayStep));
    registry.register(Arc::new(checkout::CheckoutStep));
    registry.register(Arc::new(archive::ArchiveArtifactsStep));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_builtin_dispatch_names() {
        let mut registry = Registry::new();
        register_builtin_steps(&mut registry);
        let names = registry.known_names();
        for expected in ["sh", "echo", "readFile", "writeFile", "delay", "checkout", "archiveArtifacts"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(registry.len(), 7);
    }
}
