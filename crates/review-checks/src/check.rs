//! Quality check trait and the builtin check kinds.

use std::path::Path;

use async_trait::async_trait;
use review_core::{ChecksConfig, CodeIssue};
use serde::{Deserialize, Serialize};

use crate::eslint::EslintCheck;
use crate::error::Result;
use crate::patterns::PatternCheck;

/// A pluggable static-analysis routine producing normalized issues.
#[async_trait]
pub trait QualityCheck: Send + Sync {
    /// Name reported in outcomes and logs.
    fn name(&self) -> &str;

    /// Analyse every source file under `target`.
    async fn run(&self, target: &Path) -> Result<Vec<CodeIssue>>;
}

/// Builtin checks that can be enabled by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Linter with autofix, JSON output.
    Eslint,

    /// Marker scan for leftover debug output and TODO/FIXME notes.
    Patterns,
}

impl CheckKind {
    pub const ALL: [CheckKind; 2] = [CheckKind::Eslint, CheckKind::Patterns];

    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::Eslint => "eslint",
            CheckKind::Patterns => "patterns",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::Eslint => "Lint and autofix JS/TS sources with ESLint",
            CheckKind::Patterns => "Flag console.log calls and TODO/FIXME comments",
        }
    }

    /// Resolve a configured name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Build the check implementation from configuration.
    pub fn build(&self, config: &ChecksConfig) -> Result<Box<dyn QualityCheck>> {
        Ok(match self {
            CheckKind::Eslint => Box::new(EslintCheck::from_config(config)),
            CheckKind::Patterns => Box::new(PatternCheck::from_config(config)?),
        })
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_kind_names() {
        assert_eq!(CheckKind::Eslint.name(), "eslint");
        assert_eq!(CheckKind::Patterns.name(), "patterns");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CheckKind::from_name("eslint"), Some(CheckKind::Eslint));
        assert_eq!(CheckKind::from_name(" ESLint "), Some(CheckKind::Eslint));
        assert_eq!(CheckKind::from_name("patterns"), Some(CheckKind::Patterns));
        assert_eq!(CheckKind::from_name("prettier"), None);
        assert_eq!(CheckKind::from_name(""), None);
    }

    #[test]
    fn test_build_uses_config() {
        let config = ChecksConfig::default();
        let check = CheckKind::Eslint.build(&config).expect("build");
        assert_eq!(check.name(), "eslint");
        let check = CheckKind::Patterns.build(&config).expect("build");
        assert_eq!(check.name(), "patterns");
    }
}
