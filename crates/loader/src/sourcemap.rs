//! Maps compiled-definition positions back to the original source file.
//!
//! Grounded on the teacher's `oj-shell::span` module: byte-offset spans
//! plus a line/column resolver over the raw source text. The kernel's
//! loader doesn't compile to an intermediate form the way the teacher's
//! shell parser does, so every mapping here is 1:1 — but custom
//! mappings can still be layered on for future multi-pass loaders
//! (templated includes, macro expansion) without changing callers.

use serde::{Deserialize, Serialize};

/// A byte-range in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One entry in a `SourceMap`: a runtime position resolves to an
/// original position. `map_to_original` picks the mapping with the
/// greatest `runtime_line` not exceeding the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub runtime_line: usize,
    pub runtime_col: usize,
    pub original_line: usize,
    pub original_col: usize,
}

/// A correspondence between compiled-definition positions and the
/// original source file's positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub original_file: String,
    pub original_content: String,
    pub compiled_name: String,
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Build a 1:1 line mapping: every line in `content` maps to the
    /// same line/col in the original file. Callers compiling the
    /// definition through extra passes (includes, templating) can push
    /// additional `Mapping`s afterward; `mappings` stays sorted by
    /// `runtime_line` since `create_basic_mapping` emits lines in order
    /// and callers are expected to preserve that when inserting.
    pub fn create_basic_mapping(
        original_file: impl Into<String>,
        content: impl Into<String>,
        compiled_name: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let line_count = content.lines().count().max(1);
        let mappings = (1..=line_count)
            .map(|line| Mapping {
                runtime_line: line,
                runtime_col: 0,
                original_line: line,
                original_col: 0,
            })
            .collect();
        Self {
            original_file: original_file.into(),
            original_content: content,
            compiled_name: compiled_name.into(),
            mappings,
        }
    }

    /// Resolve a runtime `(line, col)` back to the original file's
    /// `(line, col)`, using the mapping with the greatest
    /// `runtime_line <= line`, then offsetting `col` by the delta
    /// between the query and that mapping's `runtime_col`.
    pub fn map_to_original(&self, line: usize, col: usize) -> Option<(usize, usize, &str)> {
        let mapping = self
            .mappings
            .iter()
            .filter(|m| m.runtime_line <= line)
            .max_by_key(|m| m.runtime_line)?;
        let col_delta = col.saturating_sub(mapping.runtime_col);
        Some((
            mapping.original_line,
            mapping.original_col + col_delta,
            self.original_file.as_str(),
        ))
    }

    /// Render `±context_lines` of the original content around `line`,
    /// with a caret under `col`.
    pub fn source_context(&self, line: usize, col: usize, context_lines: usize) -> String {
        let lines: Vec<&str> = self.original_content.lines().collect();
        if lines.is_empty() || line == 0 || line > lines.len() {
            return String::new();
        }
        let start = line.saturating_sub(context_lines).max(1);
        let end = (line + context_lines).min(lines.len());

        let mut out = String::new();
        for n in start..=end {
            let content = lines[n - 1];
            out.push_str(&format!("{n:>4} | {content}\n"));
            if n == line {
                out.push_str(&format!("     | {}^\n", " ".repeat(col)));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "sourcemap_tests.rs"]
mod tests;
