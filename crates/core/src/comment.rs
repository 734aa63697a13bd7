//! Markdown rendering of the grade comment.
//!
//! The title line doubles as the marker later runs use to find and hide this
//! comment (see [`crate::matcher`]), so the layout must stay stable.

// format_push_string is fine for clarity in comment generation
#![allow(clippy::format_push_string)]

use crate::result::GradeResult;

/// Icon shown for a passing grade.
pub const PASS_ICON: &str = "\u{2705}";
/// Icon shown for a failing grade.
pub const FAIL_ICON: &str = "\u{274c}";

/// Status icon for a grade.
#[must_use]
pub const fn status_icon(pass: bool) -> &'static str {
    if pass { PASS_ICON } else { FAIL_ICON }
}

/// Status phrase for a grade, e.g. "✅ Passed".
#[must_use]
pub fn status_line(pass: bool) -> String {
    let icon = status_icon(pass);
    if pass {
        format!("{icon} Passed")
    } else {
        format!("{icon} Not passed")
    }
}

/// Render the comment body for a grade result.
///
/// Output depends only on the input, so identical results give byte-identical
/// bodies.
#[must_use]
pub fn render_comment(result: &GradeResult) -> String {
    let icon = status_icon(result.passed());
    let mut md = String::new();

    md.push_str("## \u{1f4dd} HackYourFuture auto grade\n");
    md.push_str(&format!(
        "  ### Assignment Score: {} / 100 {icon}\n",
        result.score()
    ));
    md.push_str(&format!("**Status:** {}\n", status_line(result.passed())));
    md.push_str(&format!(
        "**Minimum score to pass:** {}\n",
        result.passing_score()
    ));
    md.push_str("*\u{1f9ea} The auto grade is experimental and still being improved*\n");

    md.push_str("<details>\n");
    md.push_str("<summary>Test Details</summary>\n\n");
    md.push_str("```\n");
    md.push_str(result.output.trim_end());
    md.push_str("\n```\n\n");
    md.push_str("</details>");

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ScoreRecord;

    fn grade(score: &str, passing: &str, pass: bool, output: &str) -> GradeResult {
        GradeResult {
            record: ScoreRecord {
                score: score.to_string(),
                passing_score: passing.to_string(),
                pass,
            },
            output: output.to_string(),
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(true), "\u{2705} Passed");
        assert_eq!(status_line(false), "\u{274c} Not passed");
    }

    #[test]
    fn test_render_exact_layout() {
        let body = render_comment(&grade("87", "70", true, "3 passing\n"));
        let expected = "## 📝 HackYourFuture auto grade\n\
                        \x20 ### Assignment Score: 87 / 100 ✅\n\
                        **Status:** ✅ Passed\n\
                        **Minimum score to pass:** 70\n\
                        *🧪 The auto grade is experimental and still being improved*\n\
                        <details>\n\
                        <summary>Test Details</summary>\n\
                        \n\
                        ```\n\
                        3 passing\n\
                        ```\n\
                        \n\
                        </details>";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_render_failing_grade() {
        let body = render_comment(&grade("40", "100", false, "1 failing"));
        assert!(body.contains("Assignment Score: 40 / 100 ❌"));
        assert!(body.contains("**Status:** ❌ Not passed"));
        assert!(body.contains("**Minimum score to pass:** 100"));
        assert!(!body.contains("Passed\n"));
    }

    #[test]
    fn test_render_empty_output_keeps_block() {
        let body = render_comment(&grade("0", "100", false, ""));
        assert!(body.contains("```\n\n```"));
    }

    #[test]
    fn test_render_trims_trailing_whitespace_only() {
        let body = render_comment(&grade("1", "1", true, "  indented\n\n \t\n"));
        assert!(body.contains("```\n  indented\n```"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let result = grade("55", "60", false, "some output");
        assert_eq!(render_comment(&result), render_comment(&result.clone()));
    }

    #[test]
    fn test_render_matches_own_header() {
        let body = render_comment(&grade("87", "70", true, ""));
        assert!(crate::matcher::has_status_header(&body));
    }
}
