//! Placement analysis for the delegation call inside a fixture method.

use crate::super_call::is_super_call;
use rustpython_parser::ast::{self, Expr};

/// The four unittest lifecycle methods subject to the rule.
pub const FIXTURE_METHODS: [&str; 4] = ["setUp", "tearDown", "setUpClass", "tearDownClass"];

/// Where the delegation call sits within a fixture method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// No delegation call anywhere in the body.
    Missing,
    /// Delegation call present at this body index, but not last.
    Misplaced(usize),
    /// Delegation call present and last.
    Correct,
    /// Body is just `pass` (after an optional docstring): an intentionally
    /// empty fixture, outside the rule.
    Exempt,
}

/// Classify the delegation call's position in `method`.
///
/// A leading docstring is never treated as logic. When several statements
/// match, only the first one counts; duplicate delegation calls are not a
/// separate finding.
pub fn locate_delegation(
    method: &ast::StmtFunctionDef,
    class_def: &ast::StmtClassDef,
) -> Delegation {
    let skip = usize::from(has_leading_docstring(&method.body));
    let stmts = &method.body[skip..];

    if let [ast::Stmt::Pass(_)] = stmts {
        return Delegation::Exempt;
    }

    let name = method.name.as_str();
    match stmts
        .iter()
        .position(|stmt| is_super_call(stmt, name, class_def))
    {
        None => Delegation::Missing,
        Some(i) if i + 1 == stmts.len() => Delegation::Correct,
        Some(i) => Delegation::Misplaced(skip + i),
    }
}

/// True if the first statement of `body` is a bare string literal.
pub fn has_leading_docstring(body: &[ast::Stmt]) -> bool {
    matches!(
        body.first(),
        Some(ast::Stmt::Expr(expr)) if matches!(
            expr.value.as_ref(),
            Expr::Constant(constant) if matches!(constant.value, ast::Constant::Str(_))
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;
    use indoc::indoc;

    fn parse_fixture(source: &str) -> (ast::StmtFunctionDef, ast::StmtClassDef) {
        for stmt in parse_module(source).unwrap() {
            if let ast::Stmt::ClassDef(class_def) = stmt {
                for member in &class_def.body {
                    if let ast::Stmt::FunctionDef(func) = member {
                        return (func.clone(), class_def.clone());
                    }
                }
            }
        }
        panic!("no method in source");
    }

    #[test]
    fn missing_delegation() {
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    self.x = 1
        "});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Missing);
    }

    #[test]
    fn correct_delegation_last() {
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    self.x = 1
                    super().setUp()
        "});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Correct);
    }

    #[test]
    fn lone_delegation_is_correct() {
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def tearDown(self):
                    super().tearDown()
        "});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Correct);
    }

    #[test]
    fn misplaced_delegation_reports_body_index() {
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    super().setUp()
                    self.x = 1
        "});
        assert_eq!(
            locate_delegation(&method, &class_def),
            Delegation::Misplaced(0)
        );
    }

    #[test]
    fn docstring_shifts_misplaced_index() {
        let (method, class_def) = parse_fixture(indoc! {r#"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    """Set up fixtures."""
                    super().setUp()
                    self.x = 1
        "#});
        assert_eq!(
            locate_delegation(&method, &class_def),
            Delegation::Misplaced(1)
        );
    }

    #[test]
    fn docstring_then_delegation_last_is_correct() {
        let (method, class_def) = parse_fixture(indoc! {r#"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    """Set up fixtures."""
                    self.x = 1
                    super().setUp()
        "#});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Correct);
    }

    #[test]
    fn pass_only_body_is_exempt() {
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    pass
        "});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Exempt);
    }

    #[test]
    fn docstring_then_pass_is_exempt() {
        let (method, class_def) = parse_fixture(indoc! {r#"
            class MyTest(unittest.TestCase):
                def tearDown(self):
                    """Nothing to clean up."""
                    pass
        "#});
        assert_eq!(locate_delegation(&method, &class_def), Delegation::Exempt);
    }

    #[test]
    fn duplicate_calls_first_match_wins() {
        // The first match is not last, so this is Misplaced even though a
        // second delegation call sits at the end.
        let (method, class_def) = parse_fixture(indoc! {"
            class MyTest(unittest.TestCase):
                def setUp(self):
                    super().setUp()
                    self.x = 1
                    super().setUp()
        "});
        assert_eq!(
            locate_delegation(&method, &class_def),
            Delegation::Misplaced(0)
        );
    }
}
