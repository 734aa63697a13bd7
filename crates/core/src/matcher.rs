//! Recognizing earlier grade comments posted by automation.

use crate::platform::{CommentAuthor, CommentRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Account type the platform reports for automated identities.
pub const BOT_ACCOUNT_TYPE: &str = "Bot";

const BOT_LOGIN_SUFFIX: &str = "[bot]";

#[allow(clippy::expect_used)]
static STATUS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)##\s*Assignment\s*score").expect("status header pattern is valid")
});

/// Whether `author` is an automated identity.
#[must_use]
pub fn is_bot(author: &CommentAuthor) -> bool {
    if author.kind == BOT_ACCOUNT_TYPE {
        return true;
    }
    let login = author.login.as_bytes();
    login.len() >= BOT_LOGIN_SUFFIX.len()
        && login[login.len() - BOT_LOGIN_SUFFIX.len()..]
            .eq_ignore_ascii_case(BOT_LOGIN_SUFFIX.as_bytes())
}

/// Whether `body` carries the grade status header.
#[must_use]
pub fn has_status_header(body: &str) -> bool {
    STATUS_HEADER.is_match(body)
}

/// Whether `comment` is a grade comment from an earlier run.
#[must_use]
pub fn is_stale_grade_comment(comment: &CommentRecord) -> bool {
    let from_bot = comment.user.as_ref().is_some_and(is_bot);
    let ours = comment
        .body
        .as_deref()
        .is_some_and(|body| !body.is_empty() && has_status_header(body));
    from_bot && ours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(login: &str, kind: &str) -> CommentAuthor {
        CommentAuthor {
            login: login.to_string(),
            kind: kind.to_string(),
        }
    }

    fn comment(login: &str, kind: &str, body: &str) -> CommentRecord {
        CommentRecord {
            id: 1,
            node_id: "IC_1".to_string(),
            body: Some(body.to_string()),
            user: Some(author(login, kind)),
        }
    }

    #[test]
    fn test_bot_by_account_type() {
        assert!(is_bot(&author("hyf-grader", "Bot")));
        assert!(!is_bot(&author("hyf-grader", "bot")));
        assert!(!is_bot(&author("student", "User")));
    }

    #[test]
    fn test_bot_by_login_suffix() {
        assert!(is_bot(&author("github-actions[bot]", "User")));
        assert!(is_bot(&author("hyf-grader[BOT]", "")));
        assert!(!is_bot(&author("[bot]-lover", "User")));
        assert!(!is_bot(&author("bot", "User")));
        assert!(!is_bot(&author("", "")));
    }

    #[test]
    fn test_status_header_matching() {
        assert!(has_status_header("## Assignment score"));
        assert!(has_status_header("### assignment SCORE: 10 / 100"));
        assert!(has_status_header("##Assignment   Score"));
        assert!(has_status_header("intro\n  ### Assignment Score: 87 / 100"));
        assert!(has_status_header("## Assignment scoreboard is wrong header"));
        assert!(!has_status_header("# Assignment score"));
        assert!(!has_status_header("Assignment score without heading"));
        assert!(!has_status_header("## Assignment results"));
    }

    #[test]
    fn test_stale_requires_bot_and_header() {
        assert!(is_stale_grade_comment(&comment(
            "github-actions[bot]",
            "Bot",
            "## Assignment Score: 10"
        )));
        assert!(!is_stale_grade_comment(&comment(
            "github-actions[bot]",
            "Bot",
            "Thanks for the PR!"
        )));
        assert!(!is_stale_grade_comment(&comment(
            "mentor",
            "User",
            "## Assignment Score: 10"
        )));
    }

    #[test]
    fn test_stale_handles_missing_fields() {
        let mut no_body = comment("github-actions[bot]", "Bot", "");
        assert!(!is_stale_grade_comment(&no_body));
        no_body.body = None;
        assert!(!is_stale_grade_comment(&no_body));

        let mut ghost = comment("x", "Bot", "## Assignment score");
        ghost.user = None;
        assert!(!is_stale_grade_comment(&ghost));
    }
}
