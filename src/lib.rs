// Export modules for library usage
pub mod checker;
pub mod classifier;
pub mod cli;
pub mod delegation;
pub mod fixer;
pub mod parser;
pub mod super_call;

// Re-export the core API surface
pub use crate::checker::{check_file, check_source};
pub use crate::classifier::is_unittest_subclass;
pub use crate::delegation::{locate_delegation, Delegation, FIXTURE_METHODS};
pub use crate::fixer::{fix_file, fix_source};
pub use crate::parser::TESTCASE_TOKEN;
pub use crate::super_call::is_super_call;
