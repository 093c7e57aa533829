//! End-to-end runs of the check runner against scratch source trees.

use std::fs;
use std::path::Path;

use review_checks::CheckRunner;
use review_core::{CheckSuite, ChecksConfig, IssueKind, IssueSeverity};

const UNUSED_VAR_REPORT: &str = r#"[{"filePath":"src/app.ts","messages":[{"ruleId":"no-unused-vars","severity":1,"message":"'unused' is assigned a value but never used.","line":1,"column":7}],"errorCount":0,"warningCount":1}]"#;

/// Linter stand-in that prints `report` and exits with `status`.
fn fake_eslint(dir: &Path, report: &str, status: i32) -> Vec<String> {
    let fixture = dir.join("eslint-report.json");
    fs::write(&fixture, report).expect("write fixture");
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("cat '{}'; exit {}", fixture.display(), status),
        "eslint".to_string(),
    ]
}

fn source_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir_all(&src).expect("mkdir");
    fs::write(
        src.join("app.ts"),
        "const unused = 1;\nconsole.log('debug');\n",
    )
    .expect("write source");
    dir
}

#[tokio::test]
async fn eslint_warning_becomes_single_issue() {
    let tree = source_tree();
    let config = ChecksConfig {
        eslint_command: fake_eslint(tree.path(), UNUSED_VAR_REPORT, 1),
        ..ChecksConfig::default()
    };

    let runner = CheckRunner::from_names(&["eslint".to_string()], &config);
    let report = runner.run(&tree.path().join("src")).await;

    let issues = report.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Warning);
    assert_eq!(issues[0].severity, IssueSeverity::Medium);
    assert_eq!(issues[0].category, "eslint");
    assert_eq!(issues[0].rule.as_deref(), Some("no-unused-vars"));
    assert!(report.failed().next().is_none());
}

#[tokio::test]
async fn no_checks_yields_no_issues() {
    let tree = source_tree();
    let runner = CheckRunner::from_names(&[], &ChecksConfig::default());

    assert!(CheckSuite::is_empty(&runner));
    let report = runner.run(tree.path()).await;
    assert!(report.outcomes.is_empty());
    assert_eq!(report.issue_count(), 0);
}

#[tokio::test]
async fn unknown_check_name_is_ignored() {
    let tree = source_tree();
    let names = vec!["stylelint".to_string(), "patterns".to_string()];
    let runner = CheckRunner::from_names(&names, &ChecksConfig::default());

    assert_eq!(runner.check_names(), vec!["patterns"]);
    let report = runner.run(tree.path()).await;
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.issue_count(), 1);
    assert_eq!(report.issues()[0].rule.as_deref(), Some("no-console-log"));
}

#[tokio::test]
async fn failing_linter_keeps_other_findings() {
    let tree = source_tree();
    let config = ChecksConfig {
        eslint_command: fake_eslint(tree.path(), "Oops! Something went wrong!", 2),
        ..ChecksConfig::default()
    };
    let names = vec!["eslint".to_string(), "patterns".to_string()];
    let runner = CheckRunner::from_names(&names, &config);

    let report = runner.run(tree.path()).await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].is_failed());
    assert_eq!(report.outcomes[0].check_name(), "eslint");
    assert!(!report.outcomes[1].is_failed());
    assert_eq!(report.issue_count(), 1);
    assert_eq!(report.issues()[0].category, "patterns");
}

#[tokio::test]
async fn missing_linter_binary_is_a_failed_outcome() {
    let tree = source_tree();
    let config = ChecksConfig {
        eslint_command: vec!["definitely-not-eslint-4711".to_string()],
        ..ChecksConfig::default()
    };
    let runner = CheckRunner::from_names(&["eslint".to_string()], &config);

    let report = runner.run(tree.path()).await;

    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.issue_count(), 0);
}
