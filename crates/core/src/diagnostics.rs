//! Source-mapped diagnostics rendered for humans: a byte-range location
//! in the original definition file, an optional suggestion, and both a
//! one-line compact form and a multi-line full form with context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is, independent of whether it aborted the
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A byte-offset span in the original source, plus the 1-based line/
/// column the loader resolved it to via the source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            start,
            end,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A proposed fix or nearby alternative, typically produced by the
/// step-name suggestion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
    #[serde(default)]
    pub replacement: Option<String>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// A diagnostic ready for display, carrying enough context to render
/// either a one-line summary or a fuller excerpt-backed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedError {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub source_excerpt: Option<String>,
    #[serde(default)]
    pub cause: Option<Box<EnhancedError>>,
}

impl EnhancedError {
    pub fn new(code: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            location: None,
            suggestions: Vec::new(),
            source_excerpt: None,
            cause: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.source_excerpt = Some(excerpt.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_cause(mut self, cause: EnhancedError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// A single-line rendering: `[CODE] message at file:line:col`.
    pub fn render_compact(&self) -> String {
        match &self.location {
            Some(loc) => format!("[{}] {} at {loc}", self.code, self.message),
            None => format!("[{}] {}", self.code, self.message),
        }
    }

    /// A multi-line rendering: header, location/excerpt, suggestions,
    /// then the cause chain (if any), each prefixed with `help:`/`caused by:`.
    pub fn render_full(&self) -> String {
        let mut out = format!("{}: {}", self.severity, self.render_compact());
        if let Some(excerpt) = &self.source_excerpt {
            out.push('\n');
            out.push_str(excerpt);
        }
        for suggestion in &self.suggestions {
            out.push('\n');
            out.push_str("help: ");
            out.push_str(&suggestion.message);
            if let Some(replacement) = &suggestion.replacement {
                out.push_str(" (did you mean `");
                out.push_str(replacement);
                out.push_str("`?)");
            }
        }
        if let Some(cause) = &self.cause {
            out.push('\n');
            out.push_str("caused by: ");
            out.push_str(&cause.render_compact());
        }
        out
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
