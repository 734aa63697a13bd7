//! GitHub Actions invocation context.
//!
//! Inside a workflow, the repository, the pull request number and the API
//! endpoint come from the runner environment:
//! - `GITHUB_REPOSITORY` ("owner/repo")
//! - `GITHUB_EVENT_PATH` (JSON webhook payload)
//! - `GITHUB_REF` (e.g. "refs/pull/123/merge")
//! - `GITHUB_API_URL`, `GITHUB_TOKEN`

use secrecy::SecretString;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Values detected from the GitHub Actions environment.
#[derive(Debug, Clone, Default)]
pub struct ActionsEnvironment {
    /// Whether `GITHUB_ACTIONS=true`.
    pub in_actions: bool,
    /// Repository owner and name.
    pub repository: Option<(String, String)>,
    /// Issue or pull request number of the triggering event.
    pub issue_number: Option<u64>,
    /// Authentication token.
    pub token: Option<SecretString>,
    /// API base URL.
    pub api_url: Option<String>,
}

impl ActionsEnvironment {
    /// Read the current process environment.
    #[must_use]
    pub fn detect() -> Self {
        let in_actions = running_in_actions();

        let repository = std::env::var("GITHUB_REPOSITORY")
            .ok()
            .and_then(|r| parse_repo(&r));

        let issue_number = std::env::var("GITHUB_EVENT_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .and_then(|p| issue_number_from_event_file(Path::new(&p)))
            .or_else(|| {
                std::env::var("GITHUB_REF")
                    .ok()
                    .and_then(|r| parse_pr_number(&r))
            });

        Self {
            in_actions,
            repository,
            issue_number,
            token: non_empty_var("GITHUB_TOKEN").map(SecretString::from),
            api_url: non_empty_var("GITHUB_API_URL"),
        }
    }
}

/// Whether the process runs as a GitHub Actions step.
#[must_use]
pub fn running_in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Split "owner/repo" into its parts.
#[must_use]
pub fn parse_repo(repo_str: &str) -> Option<(String, String)> {
    let (owner, repo) = repo_str.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Extract the PR number from a ref such as "refs/pull/123/merge".
#[must_use]
pub fn parse_pr_number(github_ref: &str) -> Option<u64> {
    github_ref
        .strip_prefix("refs/pull/")?
        .split('/')
        .next()?
        .parse()
        .ok()
}

/// Issue number of a webhook payload.
///
/// Looks at `issue.number`, then `pull_request.number`, then a top-level
/// `number`.
#[must_use]
pub fn issue_number_from_event(payload: &Value) -> Option<u64> {
    payload
        .pointer("/issue/number")
        .or_else(|| payload.pointer("/pull_request/number"))
        .or_else(|| payload.get("number"))
        .and_then(Value::as_u64)
}

/// Read the payload at `path` and extract the issue number.
#[must_use]
pub fn issue_number_from_event_file(path: &Path) -> Option<u64> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %path.display(), "Could not read event payload: {e}");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(payload) => issue_number_from_event(&payload),
        Err(e) => {
            debug!(path = %path.display(), "Event payload is not valid JSON: {e}");
            None
        }
    }
}
