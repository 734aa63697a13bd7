//! GitHub implementation of [`PlatformClient`].
//!
//! Comments are listed and created through the REST API; hiding uses the
//! GraphQL `minimizeComment` mutation since REST has no equivalent.

use async_trait::async_trait;
use autograde_core::{
    CommentAuthor, CommentRecord, Error, IssueContext, PlatformClient, PostedComment, Result,
};
use octocrab::Octocrab;
use octocrab::models::issues::Comment;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Comments requested per page when listing.
pub const COMMENTS_PER_PAGE: u8 = 100;

/// Default upper bound on listed pages.
pub const DEFAULT_MAX_PAGES: u32 = 10;

const GRAPHQL_ROUTE: &str = "/graphql";

const MINIMIZE_MUTATION: &str = r"mutation($id: ID!) {
  minimizeComment(input: { subjectId: $id, classifier: OUTDATED }) {
    minimizedComment { isMinimized }
  }
}";

/// Configuration for [`GitHubPlatformClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Token used for authentication
    pub token: SecretString,
    /// REST API base URL, for GitHub Enterprise Server
    pub api_url: Option<String>,
    /// Maximum number of comment pages to fetch
    pub max_pages: u32,
}

impl GitHubClientConfig {
    /// Creates a configuration for github.com.
    #[must_use]
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: token.into(),
            api_url: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the page limit. Zero is treated as one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

/// Root that GraphQL requests are sent under for a REST `api_url`.
///
/// GitHub Enterprise Server serves REST at `/api/v3` but GraphQL at
/// `/api/graphql`, so the `/v3` segment is dropped. github.com uses
/// `https://api.github.com` for both.
#[must_use]
pub fn graphql_base(api_url: &str) -> String {
    let trimmed = api_url.trim_end_matches('/');
    trimmed.strip_suffix("/v3").unwrap_or(trimmed).to_string()
}

/// Talks to GitHub through octocrab.
pub struct GitHubPlatformClient {
    rest: Octocrab,
    graphql: Octocrab,
    max_pages: u32,
}

impl GitHubPlatformClient {
    /// Creates an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is empty, the API URL is
    /// invalid, or the HTTP client cannot be built.
    pub fn new(config: &GitHubClientConfig) -> Result<Self> {
        if config.token.expose_secret().is_empty() {
            return Err(Error::configuration_with_help(
                "GITHUB_TOKEN is not set or empty",
                "Pass --token or expose secrets.GITHUB_TOKEN to the step",
            ));
        }

        let rest = build_octocrab(&config.token, config.api_url.as_deref())?;
        let graphql = match config.api_url.as_deref() {
            Some(api_url) => build_octocrab(&config.token, Some(&graphql_base(api_url)))?,
            None => rest.clone(),
        };

        Ok(Self {
            rest,
            graphql,
            max_pages: config.max_pages.max(1),
        })
    }
}

fn build_octocrab(token: &SecretString, base_uri: Option<&str>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token.clone());
    if let Some(base_uri) = base_uri {
        builder = builder.base_uri(base_uri).map_err(|e| {
            Error::configuration(format!(
                "Invalid GitHub API URL '{base_uri}': {}",
                describe(&e)
            ))
        })?;
    }
    builder.build().map_err(|e| {
        Error::configuration(format!("Failed to create GitHub client: {}", describe(&e)))
    })
}

#[async_trait]
impl PlatformClient for GitHubPlatformClient {
    async fn list_comments(&self, issue: &IssueContext) -> Result<Vec<CommentRecord>> {
        let mut page = self
            .rest
            .issues(&issue.owner, &issue.repo)
            .list_comments(issue.issue_number)
            .per_page(COMMENTS_PER_PAGE)
            .send()
            .await
            .map_err(|e| Error::list(issue.issue_number, describe(&e)))?;

        let mut comments: Vec<CommentRecord> = page.items.iter().map(to_record).collect();
        let mut fetched = 1;

        while page.next.is_some() {
            if fetched >= self.max_pages {
                warn!(
                    issue = %issue,
                    pages = fetched,
                    "Comment listing truncated at page limit"
                );
                break;
            }
            let next = self
                .rest
                .get_page::<Comment>(&page.next)
                .await
                .map_err(|e| Error::list(issue.issue_number, describe(&e)))?;
            let Some(next) = next else {
                break;
            };
            comments.extend(next.items.iter().map(to_record));
            page = next;
            fetched += 1;
        }

        debug!(issue = %issue, count = comments.len(), pages = fetched, "Listed comments");
        Ok(comments)
    }

    async fn minimize_comment(&self, comment: &CommentRecord) -> Result<()> {
        let payload = json!({
            "query": MINIMIZE_MUTATION,
            "variables": { "id": comment.node_id },
        });

        // Posted as plain JSON so the whole envelope, `errors` included, comes back.
        let response: Value = self
            .graphql
            .post(GRAPHQL_ROUTE, Some(&payload))
            .await
            .map_err(|e| Error::minimize(comment.id, describe(&e)))?;

        if let Some(message) = graphql_error(&response) {
            return Err(Error::minimize(comment.id, message));
        }
        Ok(())
    }

    async fn create_comment(&self, issue: &IssueContext, body: &str) -> Result<PostedComment> {
        let comment = self
            .rest
            .issues(&issue.owner, &issue.repo)
            .create_comment(issue.issue_number, body)
            .await
            .map_err(|e| Error::post(issue.issue_number, describe(&e)))?;

        Ok(PostedComment {
            id: comment.id.0,
            html_url: comment.html_url.to_string(),
        })
    }
}

fn to_record(comment: &Comment) -> CommentRecord {
    CommentRecord {
        id: comment.id.0,
        node_id: comment.node_id.clone(),
        body: comment.body.clone(),
        user: Some(CommentAuthor {
            login: comment.user.login.clone(),
            kind: comment.user.r#type.clone(),
        }),
    }
}

/// One-line description of an octocrab error.
///
/// octocrab's `Display` appends a captured backtrace, which must not leak
/// into log lines or workflow annotations.
fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            format!("{} ({})", source.message, source.status_code)
        }
        other => std::error::Error::source(other)
            .map_or_else(|| other.to_string(), ToString::to_string),
    }
}

/// GraphQL reports failures in an `errors` array next to a 200 status.
fn graphql_error(response: &Value) -> Option<String> {
    let errors = response.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();
    if messages.is_empty() {
        Some("GraphQL request failed".to_string())
    } else {
        Some(messages.join("; "))
    }
}
