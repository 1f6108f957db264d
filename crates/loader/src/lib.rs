// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk-loader: the YAML definition loader. Parses and validates a
//! pipeline definition into a `pk_core::Workflow`, and provides the
//! source-mapping and suggestion-generation machinery behind the
//! kernel's diagnostics.

pub mod definition;
pub mod diagnostics;
pub mod proptree;
pub mod sourcemap;
pub mod validate;

pub use definition::load_workflow;
pub use diagnostics::{suggest, KNOWN_STEP_NAMES};
pub use proptree::PropertyTree;
pub use sourcemap::{Mapping, SourceMap, Span};
