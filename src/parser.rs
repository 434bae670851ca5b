//! Python source parsing and source-position bookkeeping.
//!
//! Wraps rustpython-parser behind the small surface the checker and fixer
//! need: a textual pre-screen, module parsing, parse-error formatting, and a
//! byte-offset to line/column index.

use rustpython_parser::{ast, Mode, ParseError};
use std::path::Path;

/// Substring that must appear in a file before it is worth parsing.
pub const TESTCASE_TOKEN: &str = "TestCase";

/// Cheap textual pre-screen: a file that never mentions `TestCase` cannot
/// contain a target class, so it is skipped without invoking the parser.
/// False positives (the token inside a comment or string) just mean the file
/// gets parsed and produces no diagnostics.
pub fn needs_parse(source: &str) -> bool {
    source.contains(TESTCASE_TOKEN)
}

/// Parse a Python module into its top-level statement list.
pub fn parse_module(source: &str) -> Result<Vec<ast::Stmt>, ParseError> {
    let module = rustpython_parser::parse(source, Mode::Module, "<module>")?;
    match module {
        ast::Mod::Module(module) => Ok(module.body),
        _ => Ok(Vec::new()),
    }
}

/// Format a parse failure as a single diagnostic line with a best-effort
/// source location.
pub fn format_parse_error(err: &ParseError, source: &str, path: &Path) -> String {
    let index = LineIndex::new(source);
    let (line, col) = index.line_col(err.offset.to_usize());
    format!(
        "{}:{}:{}: SyntaxError: {}",
        path.display(),
        line,
        col,
        err.error
    )
}

/// Byte-offset to line/column mapping for a single source buffer.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// 0-based index of the line containing `offset`. Offsets past the end
    /// of the buffer clamp to the last line.
    pub fn line_index(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Byte offset at which 0-based `line` starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    /// 1-based (line, column) of `offset`; columns counted in bytes.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        (line + 1, offset - self.line_starts[line] + 1)
    }
}
