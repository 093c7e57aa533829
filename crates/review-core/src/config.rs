//! Review configuration.
//!
//! Loaded from an optional TOML file (`ai-review.toml` in the working
//! directory unless a path is given). Every field has a default, so a
//! missing file or a partial file is fine. Secrets are never read from
//! the file; they come from `GITHUB_TOKEN` and `OPENAI_API_KEY`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ReviewError};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "ai-review.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    pub llm: LlmConfig,
    pub github: GitHubConfig,
    pub review: ReviewSettings,
    pub checks: ChecksConfig,
}

/// Completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,

    /// OpenAI-compatible API base, without trailing slash.
    pub api_base: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Request timeout. Unset means the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            max_tokens: 2000,
            temperature: 0.3,
            timeout_secs: None,
        }
    }
}

/// Source-control provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// Pipeline behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReviewSettings {
    /// Rendered diffs are cut to this many characters.
    pub max_diff_chars: usize,

    /// Post the review as a change-set comment.
    pub publish: bool,

    /// Path the quality checks run against.
    pub target_path: PathBuf,

    /// Where `review-results.json` is written, if anywhere.
    pub output_dir: Option<PathBuf>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            max_diff_chars: 32_000,
            publish: true,
            target_path: PathBuf::from("./src"),
            output_dir: None,
        }
    }
}

/// Quality check settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChecksConfig {
    /// Check names to enable, in execution order. Unknown names are ignored.
    pub enabled: Vec<String>,

    /// Linter command line; the file glob is appended.
    pub eslint_command: Vec<String>,

    /// Extensions the linter glob covers.
    pub extensions: Vec<String>,

    /// Per-check timeout, 0 disables it.
    pub timeout_secs: u64,

    /// Globs (relative to the target) scanned by file-walking checks.
    pub include: Vec<String>,

    pub exclude: Vec<String>,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            enabled: vec!["eslint".to_string()],
            eslint_command: vec![
                "npx".to_string(),
                "eslint".to_string(),
                "--fix".to_string(),
                "--format".to_string(),
                "json".to_string(),
                "--no-error-on-unmatched-pattern".to_string(),
            ],
            extensions: ["ts", "tsx", "js", "jsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: 300,
            include: ["**/*.ts", "**/*.tsx", "**/*.js", "**/*.jsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: ["**/node_modules/**", "**/dist/**", "**/build/**"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ReviewConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `ai-review.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ReviewError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Self::from_file(p)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `OPENAI_MODEL` overrides the configured model.
    pub fn apply_env(&mut self) {
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                self.llm.model = model.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(ReviewError::Config("llm.model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ReviewError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.review.max_diff_chars == 0 {
            return Err(ReviewError::Config(
                "review.max_diff_chars must be positive".to_string(),
            ));
        }
        if self.checks.eslint_command.is_empty() {
            return Err(ReviewError::Config(
                "checks.eslint_command must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Access tokens, read from the environment only.
#[derive(Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            github_token: non_empty_env("GITHUB_TOKEN"),
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
        }
    }

    pub fn require_github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .ok_or_else(|| ReviewError::Config("GITHUB_TOKEN is not set".to_string()))
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ReviewError::Config("OPENAI_API_KEY is not set".to_string()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReviewConfig::default();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 2000);
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.review.max_diff_chars, 32_000);
        assert!(config.review.publish);
        assert_eq!(config.checks.enabled, vec!["eslint".to_string()]);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReviewConfig::from_toml(
            r#"
[llm]
model = "gpt-4o"

[checks]
enabled = ["eslint", "patterns"]
"#,
        )
        .expect("parse");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.checks.enabled.len(), 2);
        assert_eq!(config.github.api_base, "https://api.github.com");
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        let mut config = ReviewConfig::default();
        config.review.publish = false;
        config.llm.timeout_secs = Some(45);
        file.write_all(config.to_toml().expect("to_toml").as_bytes())
            .expect("write");

        let loaded = ReviewConfig::from_file(file.path()).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let err = ReviewConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ReviewError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ReviewConfig::from_toml("[llm\nmodel = ").unwrap_err();
        assert!(matches!(err, ReviewError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = ReviewConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = Credentials {
            github_token: Some("ghp_secret".to_string()),
            openai_api_key: None,
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ghp_secret"));
        assert!(creds.require_openai_api_key().is_err());
        assert_eq!(creds.require_github_token().expect("token"), "ghp_secret");
    }
}
