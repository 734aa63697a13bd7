//! Collaboration platform abstraction.
//!
//! The publisher talks to the platform only through [`PlatformClient`], so it
//! can run against GitHub (see the `autograde-github` crate) or an in-memory
//! client in tests.

use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// Where the comment goes: a repository and an issue or pull request in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContext {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue or pull request number.
    pub issue_number: u64,
}

impl IssueContext {
    /// Create a new issue context.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, issue_number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            issue_number,
        }
    }
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.issue_number)
    }
}

/// Author of a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentAuthor {
    /// Login name, e.g. `github-actions[bot]`.
    pub login: String,
    /// Account type as reported by the platform, e.g. `User` or `Bot`.
    pub kind: String,
}

/// An existing comment on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentRecord {
    /// REST id.
    pub id: u64,
    /// Global node id used by GraphQL mutations.
    pub node_id: String,
    /// Markdown body, if any.
    pub body: Option<String>,
    /// Comment author, absent for deleted accounts.
    pub user: Option<CommentAuthor>,
}

/// A comment this tool created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    /// REST id of the new comment.
    pub id: u64,
    /// Link to the comment.
    pub html_url: String,
}

/// Remote operations the publisher needs.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// List every comment on the issue, in creation order.
    async fn list_comments(&self, issue: &IssueContext) -> Result<Vec<CommentRecord>>;

    /// Hide a comment as outdated. The comment is collapsed, not deleted.
    async fn minimize_comment(&self, comment: &CommentRecord) -> Result<()>;

    /// Append a comment to the issue.
    async fn create_comment(&self, issue: &IssueContext, body: &str) -> Result<PostedComment>;
}
