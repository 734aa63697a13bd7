//! Hiding grade comments left by earlier runs.

use crate::Result;
use crate::matcher::is_stale_grade_comment;
use crate::platform::{CommentRecord, IssueContext, PlatformClient};
use tracing::{debug, info, warn};

/// What happened to one stale comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimizeOutcome {
    /// The comment is now hidden.
    Minimized,
    /// The platform refused or the call failed.
    Failed {
        /// Why it failed.
        reason: String,
    },
}

/// Per-comment results of a minimize pass, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinimizeReport {
    /// `(comment id, outcome)` for every stale comment found.
    pub outcomes: Vec<(u64, MinimizeOutcome)>,
}

impl MinimizeReport {
    /// Number of comments hidden.
    #[must_use]
    pub fn minimized(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == MinimizeOutcome::Minimized)
            .count()
    }

    /// Number of comments that could not be hidden.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.minimized()
    }
}

/// Select the comments from earlier runs, keeping listing order.
#[must_use]
pub fn stale_comments(comments: &[CommentRecord]) -> Vec<&CommentRecord> {
    comments
        .iter()
        .filter(|c| is_stale_grade_comment(c))
        .collect()
}

/// Find earlier grade comments on the issue and minimize them one by one.
///
/// A failure to minimize one comment is logged and does not stop the pass.
///
/// # Errors
///
/// Returns [`crate::Error::List`] if the comments cannot be listed.
pub async fn hide_previous_comments<C>(client: &C, issue: &IssueContext) -> Result<MinimizeReport>
where
    C: PlatformClient + ?Sized,
{
    let comments = client.list_comments(issue).await?;
    let stale = stale_comments(&comments);
    debug!(
        issue = %issue,
        total = comments.len(),
        stale = stale.len(),
        "Scanned issue comments"
    );

    let mut report = MinimizeReport::default();
    for comment in stale {
        let outcome = match client.minimize_comment(comment).await {
            Ok(()) => {
                debug!(comment_id = comment.id, "Minimized previous grade comment");
                MinimizeOutcome::Minimized
            }
            Err(e) => {
                warn!(comment_id = comment.id, "{e}");
                MinimizeOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        report.outcomes.push((comment.id, outcome));
    }

    if !report.outcomes.is_empty() {
        info!(
            minimized = report.minimized(),
            failed = report.failed(),
            "Hid previous grade comments"
        );
    }

    Ok(report)
}
