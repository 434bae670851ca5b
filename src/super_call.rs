//! Recognition of delegation-call statements.
//!
//! A fixture method delegates to its parent through one of three shapes:
//!
//! ```python
//! super().setUp()                  # zero-argument super
//! super(MyTest, self).setUp()      # explicit two-argument super
//! unittest.TestCase.setUp(self)    # direct call on a declared base
//! ```
//!
//! Anything else (self-calls, free function calls, assignments) is not a
//! delegation call.

use rustpython_parser::ast::{self, Expr};

/// True if `stmt` is an accepted delegation call for `method_name` inside
/// `class_def`.
pub fn is_super_call(stmt: &ast::Stmt, method_name: &str, class_def: &ast::StmtClassDef) -> bool {
    let ast::Stmt::Expr(expr_stmt) = stmt else {
        return false;
    };
    let Expr::Call(call) = expr_stmt.value.as_ref() else {
        return false;
    };
    let Expr::Attribute(attr) = call.func.as_ref() else {
        return false;
    };
    if attr.attr.as_str() != method_name {
        return false;
    }
    if !call.keywords.is_empty() {
        return false;
    }
    match attr.value.as_ref() {
        // super().m() / super(Cls, self).m() -- the method call itself takes
        // no arguments.
        Expr::Call(receiver) => call.args.is_empty() && is_super_invocation(receiver),
        // Base.m(self), unittest.TestCase.m(self), or the classmethod
        // variants with zero arguments.
        receiver => {
            call.args.len() <= 1 && class_def.bases.iter().any(|base| same_name_path(base, receiver))
        }
    }
}

/// `super()` with no arguments, or `super(X, y)` with exactly two. The
/// identifier text of the two arguments is deliberately not checked; this
/// predicate gates call shape, not correctness of the class reference.
fn is_super_invocation(call: &ast::ExprCall) -> bool {
    let Expr::Name(name) = call.func.as_ref() else {
        return false;
    };
    name.id.as_str() == "super"
        && call.keywords.is_empty()
        && (call.args.is_empty() || call.args.len() == 2)
}

/// Structural equality of name / dotted-attribute paths, used to match a
/// call receiver against the class's declared base expressions.
fn same_name_path(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Name(x), Expr::Name(y)) => x.id.as_str() == y.id.as_str(),
        (Expr::Attribute(x), Expr::Attribute(y)) => {
            x.attr.as_str() == y.attr.as_str() && same_name_path(&x.value, &y.value)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;

    fn parse_class(source: &str) -> ast::StmtClassDef {
        for stmt in parse_module(source).unwrap() {
            if let ast::Stmt::ClassDef(class_def) = stmt {
                return class_def;
            }
        }
        panic!("no class definition in source");
    }

    fn parse_stmt(source: &str) -> ast::Stmt {
        parse_module(source).unwrap().remove(0)
    }

    fn dummy_class() -> ast::StmtClassDef {
        parse_class("class Foo(unittest.TestCase): pass")
    }

    #[test]
    fn zero_arg_super_all_fixtures() {
        let cls = dummy_class();
        for method in ["setUp", "tearDown", "setUpClass", "tearDownClass"] {
            let stmt = parse_stmt(&format!("super().{method}()"));
            assert!(is_super_call(&stmt, method, &cls), "{method}");
        }
    }

    #[test]
    fn two_arg_super() {
        let cls = dummy_class();
        assert!(is_super_call(
            &parse_stmt("super(MyTest, self).setUp()"),
            "setUp",
            &cls
        ));
        assert!(is_super_call(
            &parse_stmt("super(MyTest, cls).setUpClass()"),
            "setUpClass",
            &cls
        ));
    }

    #[test]
    fn one_arg_super_rejected() {
        let cls = dummy_class();
        assert!(!is_super_call(&parse_stmt("super(MyTest).setUp()"), "setUp", &cls));
    }

    #[test]
    fn explicit_base_name() {
        let cls = parse_class("class Foo(TestCase): pass");
        assert!(is_super_call(&parse_stmt("TestCase.setUp(self)"), "setUp", &cls));
        assert!(is_super_call(
            &parse_stmt("TestCase.tearDown(self)"),
            "tearDown",
            &cls
        ));
        // Classmethod fixtures may call with no argument at all.
        assert!(is_super_call(
            &parse_stmt("TestCase.setUpClass()"),
            "setUpClass",
            &cls
        ));
    }

    #[test]
    fn explicit_base_attribute() {
        let cls = parse_class("class Foo(unittest.TestCase): pass");
        assert!(is_super_call(
            &parse_stmt("unittest.TestCase.setUp(self)"),
            "setUp",
            &cls
        ));
    }

    #[test]
    fn wrong_method_name() {
        let cls = dummy_class();
        assert!(!is_super_call(&parse_stmt("super().setUp()"), "tearDown", &cls));
    }

    #[test]
    fn self_call_not_super() {
        let cls = dummy_class();
        assert!(!is_super_call(&parse_stmt("self.setUp()"), "setUp", &cls));
    }

    #[test]
    fn plain_function_call() {
        let cls = dummy_class();
        assert!(!is_super_call(&parse_stmt("foo()"), "setUp", &cls));
    }

    #[test]
    fn assignment_not_super() {
        let cls = dummy_class();
        assert!(!is_super_call(&parse_stmt("x = 1"), "setUp", &cls));
    }

    #[test]
    fn unrelated_base_explicit_call() {
        let cls = parse_class("class Foo(TestCase): pass");
        assert!(!is_super_call(&parse_stmt("OtherBase.setUp(self)"), "setUp", &cls));
    }

    #[test]
    fn keyword_arguments_rejected() {
        let cls = dummy_class();
        assert!(!is_super_call(
            &parse_stmt("super().setUp(verbose=True)"),
            "setUp",
            &cls
        ));
    }
}
