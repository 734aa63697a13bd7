//! Publishing a grade comment to a pull request.
//!
//! One run loads the grade files, renders the comment, hides the comments
//! left by earlier runs and then posts the new one. Steps run strictly in
//! that order; hiding finishes before the post starts.

use crate::Result;
use crate::comment::render_comment;
use crate::minimize::{MinimizeReport, hide_previous_comments};
use crate::platform::{IssueContext, PlatformClient, PostedComment};
use crate::result::{GradeResult, load_results};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// How a publish run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The grade files could not be loaded; nothing was sent.
    Skipped {
        /// The load failure.
        reason: String,
    },
    /// A new comment was posted.
    Posted {
        /// The new comment.
        comment: PostedComment,
        /// What happened to the earlier comments.
        minimize: MinimizeReport,
    },
}

/// Posts grade comments through a [`PlatformClient`].
pub struct Publisher<C: PlatformClient> {
    client: Arc<C>,
    issue: IssueContext,
}

impl<C: PlatformClient> Publisher<C> {
    /// Create a publisher for one issue.
    #[must_use]
    pub fn new(client: Arc<C>, issue: IssueContext) -> Self {
        Self { client, issue }
    }

    /// The issue comments are posted to.
    #[must_use]
    pub fn issue(&self) -> &IssueContext {
        &self.issue
    }

    /// Load the grade from `workdir` and publish it.
    ///
    /// A load failure is logged and reported as [`PublishOutcome::Skipped`]
    /// without touching the platform.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::List`] if earlier comments cannot be listed
    /// and [`crate::Error::Post`] if the new comment cannot be created. Hidden
    /// comments stay hidden when the post fails.
    #[instrument(name = "publish", skip_all, fields(issue = %self.issue))]
    pub async fn publish(&self, workdir: &Path) -> Result<PublishOutcome> {
        let result = match load_results(workdir) {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to read/parse score.json or test-output.txt: {e}");
                return Ok(PublishOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        self.publish_result(&result).await
    }

    /// Publish an already loaded grade.
    ///
    /// # Errors
    ///
    /// See [`Publisher::publish`].
    pub async fn publish_result(&self, result: &GradeResult) -> Result<PublishOutcome> {
        let body = render_comment(result);

        let minimize = hide_previous_comments(self.client.as_ref(), &self.issue).await?;

        let comment = self.client.create_comment(&self.issue, &body).await?;
        info!(url = %comment.html_url, "Posted grade comment");

        Ok(PublishOutcome::Posted { comment, minimize })
    }
}
