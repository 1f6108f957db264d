//! Ordered environment variable scopes with `${NAME}` expansion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expansion failed because a referenced variable is not defined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment variable: ${{{0}}}")]
pub struct UnknownEnvVar(pub String);

/// An ordered mapping of environment variable names to values.
///
/// Insertion order is preserved (child scopes iterate their own
/// overrides last), and `expand` resolves `${NAME}` references against
/// the scope in effect at the point of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVars(IndexMap<String, String>);

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Create a child scope that overlays `overrides` on top of `self`.
    /// Parent keys not present in `overrides` remain visible; overrides
    /// shadow parent values with the same name.
    pub fn child(&self, overrides: &EnvVars) -> EnvVars {
        let mut merged = self.clone();
        for (k, v) in overrides.iter() {
            merged.set(k, v);
        }
        merged
    }

    /// Substitute every `${NAME}` occurrence in `s` with the bound value.
    /// Fails with `UnknownEnvVar` on the first unresolved reference.
    pub fn expand(&self, s: &str) -> Result<String, UnknownEnvVar> {
        let mut out = String::with_capacity(s.len());
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                if let Some(end) = s[i + 2..].find('}') {
                    let name = &s[i + 2..i + 2 + end];
                    let value = self
                        .get(name)
                        .ok_or_else(|| UnknownEnvVar(name.to_string()))?;
                    out.push_str(value);
                    i = i + 2 + end + 1;
                    continue;
                }
            }
            match s[i..].chars().next() {
                Some(ch) => {
                    out.push(ch);
                    i += ch.len_utf8();
                }
                None => break,
            }
        }
        Ok(out)
    }

    /// Convert to the `Vec<(String, String)>` shape process-spawn APIs want.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Display for EnvVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
