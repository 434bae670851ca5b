//! Whole-file checking: pre-screen, parse, class classification, and
//! per-method delegation analysis, producing diagnostics in source order.

use crate::classifier::is_unittest_subclass;
use crate::delegation::{locate_delegation, Delegation, FIXTURE_METHODS};
use crate::parser::{format_parse_error, needs_parse, parse_module, LineIndex};
use anyhow::{Context, Result};
use log::debug;
use rustpython_parser::ast::{self, Ranged};
use std::fs;
use std::path::Path;

/// One rule violation, carrying enough source geometry for both the
/// diagnostic message and the fixer's line edits.
#[derive(Debug, Clone)]
pub(crate) struct Violation {
    pub class_name: String,
    pub method_name: String,
    /// Byte offset of the method definition, for the diagnostic location.
    pub def_offset: usize,
    /// Byte range of the last body statement; the fix appends after its
    /// end, indented like the line its start sits on.
    pub last_stmt_start: usize,
    pub last_stmt_end: usize,
    /// Byte range of a misplaced delegation statement to remove, if any.
    pub remove: Option<(usize, usize)>,
}

/// Outcome of analyzing one file's content.
pub(crate) enum FileAnalysis {
    /// Pre-screen found no `TestCase` token; nothing to do.
    Skipped,
    /// File does not parse; holds the formatted diagnostic.
    ParseFailed(String),
    Analyzed(Vec<Violation>),
}

pub(crate) fn analyze_source(source: &str, path: &Path) -> FileAnalysis {
    if !needs_parse(source) {
        debug!("{}: no TestCase token, skipping parse", path.display());
        return FileAnalysis::Skipped;
    }
    let body = match parse_module(source) {
        Ok(body) => body,
        Err(err) => return FileAnalysis::ParseFailed(format_parse_error(&err, source, path)),
    };
    let mut violations = Vec::new();
    collect_from_stmts(&body, &mut violations);
    FileAnalysis::Analyzed(violations)
}

/// Walk every class definition reachable in the statement tree, including
/// classes nested inside functions, conditionals, and other classes.
fn collect_from_stmts(stmts: &[ast::Stmt], violations: &mut Vec<Violation>) {
    for stmt in stmts {
        match stmt {
            ast::Stmt::ClassDef(class_def) => {
                if is_unittest_subclass(class_def) {
                    collect_from_class(class_def, violations);
                }
                collect_from_stmts(&class_def.body, violations);
            }
            ast::Stmt::FunctionDef(func) => collect_from_stmts(&func.body, violations),
            ast::Stmt::AsyncFunctionDef(func) => collect_from_stmts(&func.body, violations),
            ast::Stmt::If(inner) => {
                collect_from_stmts(&inner.body, violations);
                collect_from_stmts(&inner.orelse, violations);
            }
            ast::Stmt::For(inner) => {
                collect_from_stmts(&inner.body, violations);
                collect_from_stmts(&inner.orelse, violations);
            }
            ast::Stmt::AsyncFor(inner) => {
                collect_from_stmts(&inner.body, violations);
                collect_from_stmts(&inner.orelse, violations);
            }
            ast::Stmt::While(inner) => {
                collect_from_stmts(&inner.body, violations);
                collect_from_stmts(&inner.orelse, violations);
            }
            ast::Stmt::With(inner) => collect_from_stmts(&inner.body, violations),
            ast::Stmt::AsyncWith(inner) => collect_from_stmts(&inner.body, violations),
            ast::Stmt::Match(inner) => {
                for case in &inner.cases {
                    collect_from_stmts(&case.body, violations);
                }
            }
            ast::Stmt::Try(inner) => {
                collect_from_stmts(&inner.body, violations);
                for handler in &inner.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler) = handler;
                    collect_from_stmts(&handler.body, violations);
                }
                collect_from_stmts(&inner.orelse, violations);
                collect_from_stmts(&inner.finalbody, violations);
            }
            ast::Stmt::TryStar(inner) => {
                collect_from_stmts(&inner.body, violations);
                for handler in &inner.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler) = handler;
                    collect_from_stmts(&handler.body, violations);
                }
                collect_from_stmts(&inner.orelse, violations);
                collect_from_stmts(&inner.finalbody, violations);
            }
            _ => {}
        }
    }
}

fn collect_from_class(class_def: &ast::StmtClassDef, violations: &mut Vec<Violation>) {
    for member in &class_def.body {
        let ast::Stmt::FunctionDef(method) = member else {
            continue;
        };
        if !FIXTURE_METHODS.contains(&method.name.as_str()) {
            continue;
        }
        let remove = match locate_delegation(method, class_def) {
            Delegation::Correct | Delegation::Exempt => continue,
            Delegation::Missing => None,
            Delegation::Misplaced(i) => {
                let range = method.body[i].range();
                Some((range.start().to_usize(), range.end().to_usize()))
            }
        };
        // Python grammar guarantees a non-empty body.
        let Some(last) = method.body.last() else {
            continue;
        };
        violations.push(Violation {
            class_name: class_def.name.to_string(),
            method_name: method.name.to_string(),
            def_offset: method.range.start().to_usize(),
            last_stmt_start: last.range().start().to_usize(),
            last_stmt_end: last.range().end().to_usize(),
            remove,
        });
    }
}

pub(crate) fn format_violation(violation: &Violation, index: &LineIndex, path: &Path) -> String {
    let (line, col) = index.line_col(violation.def_offset);
    format!(
        "{}:{}:{}: {}.{}() must call super().{}() as the last statement",
        path.display(),
        line,
        col,
        violation.class_name,
        violation.method_name,
        violation.method_name
    )
}

/// Check already-loaded source text.
pub fn check_source(source: &str, path: &Path) -> Vec<String> {
    match analyze_source(source, path) {
        FileAnalysis::Skipped => Vec::new(),
        FileAnalysis::ParseFailed(diag) => vec![diag],
        FileAnalysis::Analyzed(violations) => {
            let index = LineIndex::new(source);
            violations
                .iter()
                .map(|v| format_violation(v, &index, path))
                .collect()
        }
    }
}

/// Check one file, returning human-readable diagnostics in source order.
pub fn check_file(path: &Path) -> Result<Vec<String>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(check_source(&source, path))
}
