//! Review synthesis: prompt construction, one completion call, and
//! heuristic extraction of metrics from the free-text answer.
//!
//! Parsing sits behind [`ReviewParser`] so the bullet/keyword heuristics
//! can be replaced by structured-output parsing without touching the
//! pipeline.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::domain::{CheckRunReport, CodeReviewResult, IssueSeverity, DEFAULT_QUALITY_SCORE};
use crate::error::Result;
use crate::ports::{CompletionClient, CompletionRequest};

/// Upper bound on extracted suggestions.
pub const MAX_SUGGESTIONS: usize = 10;

/// Score lost per issue mentioned in the review text.
const MENTION_PENALTY: u8 = 10;

const SYSTEM_PROMPT: &str = "You are an expert code reviewer. \
Provide constructive, actionable feedback on the changes you are shown.";

/// Case-insensitive issue mention pattern; matches inside longer words too.
const ISSUE_PATTERN: &str = r"(?i)issue|problem|bug|vulnerability|concern";

/// Phrases that mark a line as a recommendation.
const SUGGESTION_MARKERS: &[&str] = &["suggest", "recommend", "consider", "should"];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Metrics extracted from review text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAnalysis {
    /// Number of issue mentions in the text.
    pub issue_mentions: usize,
    pub suggestions: Vec<String>,
    /// Score before check findings are applied, 0-100.
    pub quality_score: u8,
}

impl Default for ReviewAnalysis {
    /// Conservative metrics for empty or unusable model output.
    fn default() -> Self {
        Self {
            issue_mentions: 0,
            suggestions: Vec::new(),
            quality_score: DEFAULT_QUALITY_SCORE,
        }
    }
}

/// Turns completion text into metrics. Must not fail: unusable input
/// yields [`ReviewAnalysis::default`].
pub trait ReviewParser: Send + Sync {
    fn parse(&self, review: &str) -> ReviewAnalysis;
}

/// Keyword and bullet heuristics over free text.
#[derive(Debug, Clone)]
pub struct HeuristicReviewParser {
    issue_pattern: Option<Regex>,
}

impl Default for HeuristicReviewParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicReviewParser {
    pub fn new() -> Self {
        Self {
            issue_pattern: Regex::new(ISSUE_PATTERN).ok(),
        }
    }

    fn count_mentions(&self, review: &str) -> usize {
        self.issue_pattern
            .as_ref()
            .map(|re| re.find_iter(review).count())
            .unwrap_or(0)
    }

    fn extract_suggestions(review: &str) -> Vec<String> {
        review
            .lines()
            .filter_map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let body = strip_bullet(trimmed);
                let lower = trimmed.to_lowercase();
                let is_bullet = body.len() != trimmed.len();
                let is_recommendation = SUGGESTION_MARKERS.iter().any(|m| lower.contains(m));
                if (is_bullet || is_recommendation) && !body.is_empty() {
                    Some(body.to_string())
                } else {
                    None
                }
            })
            .take(MAX_SUGGESTIONS)
            .collect()
    }
}

impl ReviewParser for HeuristicReviewParser {
    fn parse(&self, review: &str) -> ReviewAnalysis {
        if review.trim().is_empty() {
            return ReviewAnalysis::default();
        }

        let issue_mentions = self.count_mentions(review);
        let penalty = issue_mentions.saturating_mul(MENTION_PENALTY as usize);
        let quality_score = (DEFAULT_QUALITY_SCORE as usize).saturating_sub(penalty) as u8;

        ReviewAnalysis {
            issue_mentions,
            suggestions: Self::extract_suggestions(review),
            quality_score,
        }
    }
}

/// Strip a leading `-`, `*`, `•` or `1.` / `1)` list marker.
fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Combine parsed review metrics with quality check findings.
///
/// Returns `(issues_found, quality_score)`. Each check finding costs
/// 5 (high), 2 (medium) or 1 (low) points.
pub fn aggregate_metrics(analysis: &ReviewAnalysis, checks: &CheckRunReport) -> (usize, u8) {
    let issues_found = analysis.issue_mentions + checks.issue_count();

    let penalty = checks.count_by_severity(IssueSeverity::High) * 5
        + checks.count_by_severity(IssueSeverity::Medium) * 2
        + checks.count_by_severity(IssueSeverity::Low);
    let quality_score = (analysis.quality_score as usize).saturating_sub(penalty) as u8;

    (issues_found, quality_score)
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Settings for the completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.3,
        }
    }
}

impl From<&LlmConfig> for SynthesisSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Build the user prompt embedding the rendered diffs.
pub fn build_review_prompt(diffs: &str) -> String {
    format!(
        r#"You are an expert code quality assistant.

Review the following Git diff snippets and provide constructive, actionable feedback:

{diffs}

Please provide a code review that covers:

1. **Code Quality Issues**: problems, anti-patterns, or areas for improvement
2. **Security Concerns**: potential vulnerabilities or unsafe practices
3. **Performance Optimizations**: improvements where applicable
4. **Best Practices**: idiomatic patterns for the languages involved
5. **Testing Suggestions**: tests that should be added or improved
6. **Documentation**: places where documentation could be improved

Format your response in clear sections with actionable recommendations. Be specific and constructive."#
    )
}

/// Sends diffs to the completion endpoint and derives review metrics.
pub struct ReviewSynthesizer {
    client: Arc<dyn CompletionClient>,
    parser: Box<dyn ReviewParser>,
    settings: SynthesisSettings,
}

impl ReviewSynthesizer {
    pub fn new(client: Arc<dyn CompletionClient>, settings: SynthesisSettings) -> Self {
        Self {
            client,
            parser: Box::new(HeuristicReviewParser::new()),
            settings,
        }
    }

    /// Swap the review parser.
    pub fn with_parser(mut self, parser: Box<dyn ReviewParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Call the completion endpoint once and build the review result.
    ///
    /// Transport failures propagate. Empty or unusable text produces a
    /// successful result with default metrics.
    pub async fn synthesize(
        &self,
        diffs: &str,
        files_reviewed: usize,
        checks: &CheckRunReport,
    ) -> Result<CodeReviewResult> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_review_prompt(diffs),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        debug!(
            model = self.client.model(),
            prompt_chars = request.prompt.len(),
            "Requesting review completion"
        );
        let review = self.client.complete(&request).await?;

        if review.trim().is_empty() {
            warn!("Completion returned no text, using default metrics");
        }

        let analysis = self.parser.parse(&review);
        let (issues_found, quality_score) = aggregate_metrics(&analysis, checks);

        info!(
            issues_found,
            quality_score,
            suggestions = analysis.suggestions.len(),
            "Review synthesized"
        );

        Ok(CodeReviewResult::succeeded(
            review,
            files_reviewed,
            issues_found,
            analysis.suggestions,
            quality_score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckOutcome, CodeIssue, IssueKind};

    fn parse(text: &str) -> ReviewAnalysis {
        HeuristicReviewParser::new().parse(text)
    }

    #[test]
    fn test_empty_review_gets_defaults() {
        assert_eq!(parse(""), ReviewAnalysis::default());
        assert_eq!(parse("   \n\t"), ReviewAnalysis::default());
    }

    #[test]
    fn test_counts_issue_mentions_case_insensitive() {
        let analysis = parse("One Issue here. Another problem, and a BUG.\nNo concerns otherwise.");
        assert_eq!(analysis.issue_mentions, 4);
        assert_eq!(analysis.quality_score, 60);
    }

    #[test]
    fn test_counts_mentions_inside_words() {
        let analysis = parse("Debugging shows problematic code; this issued a bugfix.");
        assert_eq!(analysis.issue_mentions, 4);
        assert_eq!(analysis.quality_score, 60);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let text = "bug ".repeat(25);
        assert_eq!(parse(&text).quality_score, 0);
    }

    #[test]
    fn test_bullets_become_suggestions() {
        let analysis = parse(
            "## Summary\nLooks fine.\n- Extract the helper\n* Rename `x`\n• Add docs\n2. Split the module\nPlain line",
        );
        assert_eq!(
            analysis.suggestions,
            vec![
                "Extract the helper".to_string(),
                "Rename `x`".to_string(),
                "Add docs".to_string(),
                "Split the module".to_string(),
            ]
        );
    }

    #[test]
    fn test_recommendation_lines_become_suggestions() {
        let analysis = parse("You should add tests.\nI recommend caching.\nNothing else.");
        assert_eq!(analysis.suggestions.len(), 2);
        assert_eq!(analysis.suggestions[0], "You should add tests.");
    }

    #[test]
    fn test_suggestions_are_capped() {
        let text = (0..25).map(|i| format!("- item {}", i)).collect::<Vec<_>>().join("\n");
        assert_eq!(parse(&text).suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_strip_bullet_leaves_plain_text() {
        assert_eq!(strip_bullet("2024 was a year"), "2024 was a year");
        assert_eq!(strip_bullet("-dash"), "-dash");
        assert_eq!(strip_bullet("10) ten"), "ten");
    }

    #[test]
    fn test_aggregate_without_findings_keeps_score() {
        let analysis = ReviewAnalysis {
            issue_mentions: 2,
            suggestions: vec![],
            quality_score: 80,
        };
        let (issues, score) = aggregate_metrics(&analysis, &CheckRunReport::default());
        assert_eq!(issues, 2);
        assert_eq!(score, 80);
    }

    #[test]
    fn test_aggregate_applies_check_penalties() {
        let mk = |sev| CodeIssue::new("eslint", IssueKind::Warning, sev, "m", "a.ts", 1, 1);
        let checks = CheckRunReport::new(vec![CheckOutcome::Passed {
            check: "eslint".to_string(),
            issues: vec![
                mk(IssueSeverity::High),
                mk(IssueSeverity::Medium),
                mk(IssueSeverity::Low),
            ],
            duration_ms: 1,
        }]);
        let (issues, score) = aggregate_metrics(&ReviewAnalysis::default(), &checks);
        assert_eq!(issues, 3);
        assert_eq!(score, 100 - 5 - 2 - 1);
    }

    #[test]
    fn test_prompt_embeds_diffs() {
        let prompt = build_review_prompt("FILE: a.ts\n+let x = 1;");
        assert!(prompt.contains("FILE: a.ts\n+let x = 1;"));
        assert!(prompt.contains("Security Concerns"));
    }
}
