//! Quality checks for ai-review.
//!
//! Each check analyses the sources under a target path and reports
//! normalized [`review_core::CodeIssue`]s. [`CheckRunner`] runs the enabled
//! checks and implements [`review_core::CheckSuite`] for the pipeline.

pub mod check;
pub mod command;
pub mod error;
pub mod eslint;
pub mod patterns;
pub mod runner;

pub use check::{CheckKind, QualityCheck};
pub use command::{run_tool, ToolCommand, ToolOutput};
pub use error::{CheckError, Result};
pub use eslint::{parse_eslint_output, source_glob, EslintCheck};
pub use patterns::PatternCheck;
pub use runner::CheckRunner;
