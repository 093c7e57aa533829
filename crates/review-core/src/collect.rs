//! Diff rendering for collected change-set files.

use crate::domain::ChangedFile;

/// Render patches as `FILE: <name>\n<patch>` blocks separated by a blank
/// line, cut to at most `max_chars` characters.
///
/// Files without a patch (binary, too large) are left out of the text but
/// still count as reviewed.
pub fn render_diffs(files: &[ChangedFile], max_chars: usize) -> String {
    let rendered = files
        .iter()
        .filter_map(|f| {
            f.patch
                .as_deref()
                .map(|patch| format!("FILE: {}\n{}", f.filename, patch))
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    truncate_chars(rendered, max_chars)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_skips_files_without_patch() {
        let files = vec![
            ChangedFile::new("src/a.ts", Some("@@ -1 +1 @@\n-a\n+b".to_string())),
            ChangedFile::new("logo.png", None),
            ChangedFile::new("src/b.ts", Some("@@ -2 +2 @@".to_string())),
        ];
        let diffs = render_diffs(&files, 32_000);
        assert_eq!(
            diffs,
            "FILE: src/a.ts\n@@ -1 +1 @@\n-a\n+b\n\nFILE: src/b.ts\n@@ -2 +2 @@"
        );
    }

    #[test]
    fn test_render_truncates() {
        let files = vec![ChangedFile::new("a", Some("x".repeat(100)))];
        let diffs = render_diffs(&files, 10);
        assert_eq!(diffs.chars().count(), 10);
        assert!(diffs.starts_with("FILE: a\nx"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld".to_string();
        assert_eq!(truncate_chars(text.clone(), 2), "hé");
        assert_eq!(truncate_chars(text.clone(), 100), text);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_diffs(&[], 100), "");
    }
}
