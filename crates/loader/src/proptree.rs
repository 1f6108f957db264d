//! A typed, path-addressed view over a hierarchical property map,
//! used to build a `Workflow` from a loaded YAML document while
//! keeping every failure's offending path (`stages[1].steps[3]...`)
//! available for `KernelError::Definition`.

use pk_core::KernelError;
use serde_json::Value;

/// A node in the property tree plus the dotted/indexed path that
/// reaches it from the document root, for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct PropertyTree<'a> {
    value: &'a Value,
    path: &'a str,
}

impl<'a> PropertyTree<'a> {
    pub fn root(value: &'a Value, path: &'a str) -> Self {
        Self { value, path }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    pub fn value(&self) -> &Value {
        self.value
    }

    fn err(&self, message: impl Into<String>) -> KernelError {
        KernelError::Definition {
            path: self.path.to_string(),
            message: message.into(),
        }
    }

    /// Descend into a mapping field. Borrowing a new path string back
    /// out as `&'a str` would need an arena; callers that need a
    /// child's path own it instead via `child_path`.
    pub fn get(&self, key: &str) -> Result<Option<&'a Value>, KernelError> {
        match self.value {
            Value::Object(map) => Ok(map.get(key)),
            Value::Null => Ok(None),
            _ => Err(self.err(format!("expected a mapping to read field `{key}`"))),
        }
    }

    pub fn child_path(&self, segment: impl std::fmt::Display) -> String {
        if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.path, segment)
        }
    }

    pub fn index_path(&self, index: usize) -> String {
        format!("{}[{}]", self.path, index)
    }

    pub fn as_str(&self) -> Result<&'a str, KernelError> {
        self.value.as_str().ok_or_else(|| self.err("expected a string"))
    }

    pub fn as_mapping(&self) -> Result<&'a serde_json::Map<String, Value>, KernelError> {
        self.value.as_object().ok_or_else(|| self.err("expected a mapping"))
    }

    pub fn as_sequence(&self) -> Result<&'a Vec<Value>, KernelError> {
        self.value.as_array().ok_or_else(|| self.err("expected a sequence"))
    }
}

#[cfg(test)]
#[path = "proptree_tests.rs"]
mod tests;
