//! Whole-file fixing: rewrites files so fixture methods delegate to their
//! parent implementation as the last statement.
//!
//! Edits are computed against the original line numbering and applied in a
//! single rebuild pass, so earlier insertions never shift later ones. A
//! misplaced call of any accepted form is normalized to the canonical
//! `super().method()` spelling.

use crate::checker::{analyze_source, format_violation, FileAnalysis, Violation};
use crate::parser::LineIndex;
use anyhow::{Context, Result};
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Fix one file in place. Returns the diagnostics that could not be fixed
/// (parse errors) and whether the file was rewritten. Idempotent: a second
/// run on the same file reports `(vec![], false)`.
pub fn fix_file(path: &Path) -> Result<(Vec<String>, bool)> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (diagnostics, fixed) = fix_source(&source, path);
    let modified = match fixed {
        Some(content) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!("{}: rewritten", path.display());
            true
        }
        None => false,
    };
    Ok((diagnostics, modified))
}

/// Compute the fixed text for already-loaded source. Returns the
/// diagnostics that could not be fixed (parse errors, misplaced statements
/// that cannot be removed line by line) plus the rewritten content when at
/// least one edit applied; `None` means the source is untouched.
pub fn fix_source(source: &str, path: &Path) -> (Vec<String>, Option<String>) {
    match analyze_source(source, path) {
        FileAnalysis::Skipped => (Vec::new(), None),
        FileAnalysis::ParseFailed(diag) => (vec![diag], None),
        FileAnalysis::Analyzed(violations) => {
            let index = LineIndex::new(source);
            let (fixable, unfixable): (Vec<Violation>, Vec<Violation>) =
                violations.into_iter().partition(|violation| {
                    match violation.remove {
                        Some((start, end)) => owns_its_lines(source, &index, start, end),
                        None => true,
                    }
                });
            let diagnostics = unfixable
                .iter()
                .map(|violation| format_violation(violation, &index, path))
                .collect();
            let fixed = if fixable.is_empty() {
                None
            } else {
                Some(apply_edits(source, &index, &fixable))
            };
            (diagnostics, fixed)
        }
    }
}

/// A misplaced statement can only be deleted line by line when it has its
/// line span to itself: nothing but whitespace before it (a one-line `def`
/// or a preceding `;`-joined statement would be deleted with it), and
/// nothing but whitespace or a comment after it. Statements that fail this
/// test are reported instead of rewritten.
fn owns_its_lines(source: &str, index: &LineIndex, start: usize, end: usize) -> bool {
    let prefix = &source[index.line_start(index.line_index(start))..start];
    if !prefix.trim().is_empty() {
        return false;
    }
    let suffix = source[end..].split('\n').next().unwrap_or("").trim_start();
    suffix.is_empty() || suffix.starts_with('#')
}

/// Rebuild the source line by line: drop the lines of misplaced delegation
/// statements, and append a canonical call after the last line of each
/// offending method body. All indices refer to the original text.
fn apply_edits(source: &str, index: &LineIndex, violations: &[Violation]) -> String {
    let trailing_newline = source.ends_with('\n');
    let mut lines: Vec<&str> = source.split('\n').collect();
    if trailing_newline {
        lines.pop();
    }

    let mut removed: HashSet<usize> = HashSet::new();
    let mut insertions: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for violation in violations {
        if let Some((start, end)) = violation.remove {
            let first = index.line_index(start);
            let last = index.line_index(end.saturating_sub(1));
            removed.extend(first..=last);
        }
        let indent = leading_whitespace(lines[index.line_index(violation.last_stmt_start)]);
        let anchor = index.line_index(violation.last_stmt_end.saturating_sub(1));
        insertions
            .entry(anchor)
            .or_default()
            .push(format!("{indent}super().{}()", violation.method_name));
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + violations.len());
    for (i, line) in lines.iter().enumerate() {
        if !removed.contains(&i) {
            out.push((*line).to_string());
        }
        if let Some(added) = insertions.get(&i) {
            out.extend(added.iter().cloned());
        }
    }

    let mut result = out.join("\n");
    if trailing_newline {
        result.push('\n');
    }
    result
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
