//! ai-review - automated change-set quality review
//!
//! ## Commands
//!
//! - `review`: collect a pull request's diffs, run quality checks,
//!   synthesize an LLM review and post it as a comment
//! - `check`: run the quality checks locally
//! - `config`: write or print the configuration
//! - `checks`: list the builtin checks

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use review_checks::{CheckKind, CheckRunner};
use review_core::config::DEFAULT_CONFIG_FILE;
use review_core::{
    ChangeSetRef, CheckOutcome, CheckRunReport, Credentials, PipelineOptions, PipelineReport,
    ReviewConfig, ReviewPipeline, ReviewSynthesizer, SynthesisSettings,
};
use review_providers::{GitHubClient, OpenAiClient};
use tracing::{info, Level};

/// File the pipeline report is written to inside the output directory.
const RESULTS_FILE: &str = "review-results.json";

#[derive(Parser)]
#[command(name = "ai-review")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automated code quality review for pull requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (default: ./ai-review.toml when present)
    #[arg(short, long, global = true, env = "AI_REVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a pull request and post the result as a comment
    Review {
        /// Repository as owner/name
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,

        /// Pull request number
        #[arg(long, env = "PR_NUMBER")]
        pr: u64,

        /// Path the quality checks run against
        #[arg(long)]
        target: Option<PathBuf>,

        /// Do not post the review comment
        #[arg(long)]
        no_publish: bool,

        /// Directory to write review-results.json to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the quality checks without reviewing a pull request
    Check {
        /// Path to analyse
        #[arg(long)]
        target: Option<PathBuf>,

        /// Comma-separated check names (default: checks.enabled)
        #[arg(long, value_delimiter = ',')]
        checks: Option<Vec<String>>,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Builtin quality checks
    Checks {
        #[command(subcommand)]
        action: ChecksAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Subcommand)]
enum ChecksAction {
    /// List recognised check names
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    review_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Review {
            repo,
            pr,
            target,
            no_publish,
            output,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_review_overrides(&mut config, target, no_publish, output);
            let change_set = ChangeSetRef::parse(&repo, pr)
                .context("Invalid --repo/--pr arguments")?;
            cmd_review(&config, &Credentials::from_env(), &change_set).await
        }
        Commands::Check { target, checks } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_check(&config, target, checks).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => cmd_config_init(&path, force),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
        Commands::Checks { action } => match action {
            ChecksAction::List => {
                let config = load_config(cli.config.as_deref())?;
                cmd_checks_list(&config);
                Ok(())
            }
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<ReviewConfig> {
    ReviewConfig::load(path).context("Failed to load configuration")
}

fn apply_review_overrides(
    config: &mut ReviewConfig,
    target: Option<PathBuf>,
    no_publish: bool,
    output: Option<PathBuf>,
) {
    if let Some(target) = target {
        config.review.target_path = target;
    }
    if no_publish {
        config.review.publish = false;
    }
    if output.is_some() {
        config.review.output_dir = output;
    }
}

fn build_pipeline(config: &ReviewConfig, credentials: &Credentials) -> Result<ReviewPipeline> {
    let token = credentials.require_github_token()?;
    let api_key = credentials.require_openai_api_key()?;

    let source = GitHubClient::from_config(&config.github, token)
        .context("Failed to create GitHub client")?;
    let completion = OpenAiClient::from_config(&config.llm, api_key)
        .context("Failed to create completion client")?;
    let synthesizer =
        ReviewSynthesizer::new(Arc::new(completion), SynthesisSettings::from(&config.llm));
    let checks = CheckRunner::from_config(&config.checks);

    Ok(ReviewPipeline::new(
        Arc::new(source),
        synthesizer,
        Arc::new(checks),
        PipelineOptions::from(config),
    ))
}

async fn cmd_review(
    config: &ReviewConfig,
    credentials: &Credentials,
    change_set: &ChangeSetRef,
) -> Result<()> {
    let pipeline = build_pipeline(config, credentials)?;

    println!("Reviewing {}", change_set);
    let report = pipeline.run(change_set).await;
    print!("{}", render_summary(&report));

    if let Some(dir) = &config.review.output_dir {
        let path = write_report(&report, dir)?;
        println!("Results written to {}", path.display());
    }

    match &report.result.error {
        Some(error) if !report.succeeded() => anyhow::bail!("Review failed: {}", error),
        _ if !report.succeeded() => anyhow::bail!("Review failed"),
        _ => Ok(()),
    }
}

/// Write the report as pretty JSON into `dir`, creating it if needed.
fn write_report(report: &PipelineReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(RESULTS_FILE);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Review results saved");
    Ok(path)
}

fn render_summary(report: &PipelineReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push_str(&format!("Run ID:          {}\n", report.run_id));
    out.push_str(&format!(
        "Status:          {}\n",
        if result.success { "success" } else { "failed" }
    ));
    out.push_str(&format!("Files reviewed:  {}\n", result.files_reviewed));
    out.push_str(&format!("Issues found:    {}\n", result.issues_found));
    out.push_str(&format!("Quality score:   {}/100\n", result.quality_score));
    out.push_str(&format!(
        "Comment posted:  {}\n",
        if report.comment_posted { "yes" } else { "no" }
    ));
    out.push_str(&format!("Duration:        {}ms\n", report.duration_ms));
    if let Some(error) = &result.error {
        out.push_str(&format!("Error:           {}\n", error));
    }

    if !report.checks.is_empty() {
        out.push_str("\nChecks:\n");
        for outcome in &report.checks {
            out.push_str(&format!("  {}\n", describe_outcome(outcome)));
        }
    }

    if !result.suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for suggestion in &result.suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
    }
    out
}

fn describe_outcome(outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::Passed {
            check,
            issues,
            duration_ms,
        } => format!("{:<10} ok      {} issue(s) in {}ms", check, issues.len(), duration_ms),
        CheckOutcome::Failed { check, error, .. } => {
            format!("{:<10} FAILED  {}", check, error)
        }
    }
}

async fn run_checks(
    config: &ReviewConfig,
    target: Option<PathBuf>,
    names: Option<Vec<String>>,
) -> (PathBuf, CheckRunReport) {
    let target = target.unwrap_or_else(|| config.review.target_path.clone());
    let names = names.unwrap_or_else(|| config.checks.enabled.clone());
    let runner = CheckRunner::from_names(&names, &config.checks);
    let report = runner.run(&target).await;
    (target, report)
}

async fn cmd_check(
    config: &ReviewConfig,
    target: Option<PathBuf>,
    names: Option<Vec<String>>,
) -> Result<()> {
    let (target, report) = run_checks(config, target, names).await;

    println!("Checked {}", target.display());
    for issue in report.issues() {
        println!(
            "{}:{}:{}  {:<6} {:<7} {}{}",
            issue.file_path,
            issue.line,
            issue.column,
            issue.severity,
            issue.kind,
            issue.message,
            issue
                .rule
                .as_ref()
                .map(|r| format!(" [{}]", r))
                .unwrap_or_default()
        );
    }
    for failed in report.failed() {
        println!("  {}", describe_outcome(failed));
    }
    println!(
        "{} issue(s) from {} check(s), {} failed",
        report.issue_count(),
        report.outcomes.len(),
        report.failed().count()
    );
    Ok(())
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let toml = ReviewConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_checks_list(config: &ReviewConfig) {
    for kind in CheckKind::ALL {
        let enabled = config
            .checks
            .enabled
            .iter()
            .any(|name| CheckKind::from_name(name) == Some(kind));
        println!(
            "{:<10} {:<9} {}",
            kind.name(),
            if enabled { "enabled" } else { "disabled" },
            kind.description()
        );
    }
}
