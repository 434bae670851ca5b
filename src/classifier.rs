//! Classification of class definitions as unittest.TestCase subclasses.
//!
//! Purely syntactic: a base expression counts if it is the bare name
//! `TestCase` or an attribute reference ending in `TestCase`. There is no
//! import resolution, so `unittest.TestCase`, `from unittest import
//! TestCase`, and any re-exported `x.TestCase` all match by name.

use crate::parser::TESTCASE_TOKEN;
use rustpython_parser::ast::{self, Expr};

/// True if any declared base of `class_def` resolves (by name) to
/// `unittest.TestCase`.
pub fn is_unittest_subclass(class_def: &ast::StmtClassDef) -> bool {
    class_def.bases.iter().any(base_is_testcase)
}

fn base_is_testcase(base: &Expr) -> bool {
    match base {
        Expr::Name(name) => name.id.as_str() == TESTCASE_TOKEN,
        Expr::Attribute(attr) => attr.attr.as_str() == TESTCASE_TOKEN,
        _ => false,
    }
}
