//! Executing a parsed command line.

use crate::cli::{Cli, CliError, EXIT_OK};
use autograde_core::comment::render_comment;
use autograde_core::{IssueContext, PublishOutcome, Publisher, load_results};
use autograde_github::context::parse_repo;
use autograde_github::{ActionsEnvironment, GitHubClientConfig, GitHubPlatformClient};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Everything needed to publish, resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory containing `.hyf`.
    pub workdir: PathBuf,
    /// Target issue.
    pub issue: IssueContext,
    /// GitHub client configuration.
    pub client: GitHubClientConfig,
}

impl Settings {
    /// Combine command line flags with the detected Actions environment.
    /// Flags win.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the token, the repository or the
    /// issue number cannot be determined.
    pub fn resolve(cli: &Cli, env: &ActionsEnvironment) -> Result<Self, CliError> {
        let workdir = resolve_workdir(cli)?;

        let token = cli
            .token
            .clone()
            .filter(|t| !t.expose_secret().is_empty())
            .or_else(|| env.token.clone())
            .ok_or_else(|| {
                CliError::config_with_help(
                    "No GitHub token available",
                    "Pass --token or set GITHUB_TOKEN (e.g. `env: GITHUB_TOKEN: ${{ secrets.GITHUB_TOKEN }}`)",
                )
            })?;

        let (owner, repo) = match &cli.repository {
            Some(repository) => parse_repo(repository).ok_or_else(|| {
                CliError::config(format!(
                    "Invalid repository '{repository}', expected owner/repo"
                ))
            })?,
            None => env.repository.clone().ok_or_else(|| {
                CliError::config_with_help(
                    "Repository is unknown",
                    "Pass --repository owner/repo or run inside GitHub Actions",
                )
            })?,
        };

        let issue_number = cli.issue.or(env.issue_number).ok_or_else(|| {
            CliError::config_with_help(
                "Pull request number is unknown",
                "Pass --issue, set HYF_ISSUE_NUMBER, or trigger the workflow on pull_request",
            )
        })?;

        let mut client = GitHubClientConfig::new(token).with_max_pages(cli.max_pages);
        if let Some(api_url) = cli.api_url.clone().or_else(|| env.api_url.clone()) {
            client = client.with_api_url(api_url);
        }

        Ok(Self {
            workdir,
            issue: IssueContext::new(owner, repo, issue_number),
            client,
        })
    }
}

fn resolve_workdir(cli: &Cli) -> Result<PathBuf, CliError> {
    match &cli.workdir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::other(format!("Cannot determine working directory: {e}"))),
    }
}

/// Run the command and return the process exit code.
///
/// # Errors
///
/// Returns configuration errors and GitHub API failures. A missing or
/// malformed grade is logged and ends the run successfully.
pub async fn execute(cli: &Cli, env: &ActionsEnvironment) -> Result<i32, CliError> {
    if cli.dry_run {
        return dry_run(cli);
    }

    let settings = Settings::resolve(cli, env)?;
    publish(&settings).await
}

#[instrument(name = "publish_grade", skip_all, fields(issue = %settings.issue))]
async fn publish(settings: &Settings) -> Result<i32, CliError> {
    let client = GitHubPlatformClient::new(&settings.client)?;
    let publisher = Publisher::new(Arc::new(client), settings.issue.clone());

    match publisher.publish(&settings.workdir).await? {
        PublishOutcome::Skipped { .. } => {
            info!("No grade to publish, leaving comments untouched");
        }
        PublishOutcome::Posted { comment, minimize } => {
            info!(
                comment_id = comment.id,
                hidden = minimize.minimized(),
                "Grade published to {}",
                comment.html_url
            );
        }
    }

    Ok(EXIT_OK)
}

/// Print the comment that would be posted.
#[allow(clippy::print_stdout)]
fn dry_run(cli: &Cli) -> Result<i32, CliError> {
    let workdir = resolve_workdir(cli)?;
    match load_results(&workdir) {
        Ok(result) => println!("{}", render_comment(&result)),
        Err(e) => error!("Failed to read/parse score.json or test-output.txt: {e}"),
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["hyf-autograde", "-C", "/work"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn actions_env() -> ActionsEnvironment {
        ActionsEnvironment {
            in_actions: true,
            repository: Some(("HackYourFuture".to_string(), "Assignments".to_string())),
            issue_number: Some(12),
            token: Some("ghs_env".into()),
            api_url: Some("https://api.github.com".to_string()),
        }
    }

    #[test]
    fn test_resolve_from_environment() {
        let settings = Settings::resolve(&cli(&[]), &actions_env()).unwrap();
        assert_eq!(settings.workdir, PathBuf::from("/work"));
        assert_eq!(
            settings.issue,
            IssueContext::new("HackYourFuture", "Assignments", 12)
        );
        assert_eq!(settings.client.token.expose_secret(), "ghs_env");
        assert_eq!(
            settings.client.api_url.as_deref(),
            Some("https://api.github.com")
        );
    }

    #[test]
    fn test_flags_override_environment() {
        let settings = Settings::resolve(
            &cli(&[
                "--token",
                "ghp_flag",
                "--repository",
                "someone/fork",
                "--issue",
                "99",
                "--api-url",
                "https://ghe.example.com/api/v3",
                "--max-pages",
                "2",
            ]),
            &actions_env(),
        )
        .unwrap();
        assert_eq!(settings.issue, IssueContext::new("someone", "fork", 99));
        assert_eq!(settings.client.token.expose_secret(), "ghp_flag");
        assert_eq!(
            settings.client.api_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert_eq!(settings.client.max_pages, 2);
    }

    #[test]
    fn test_missing_token() {
        let env = ActionsEnvironment {
            token: None,
            ..actions_env()
        };
        let err = Settings::resolve(&cli(&[]), &env).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_empty_token_flag_falls_back() {
        let settings = Settings::resolve(&cli(&["--token", ""]), &actions_env()).unwrap();
        assert_eq!(settings.client.token.expose_secret(), "ghs_env");
    }

    #[test]
    fn test_settings_debug_redacts_token() {
        let settings = Settings::resolve(&cli(&["--token", "ghp_flag"]), &actions_env()).unwrap();
        let printed = format!("{settings:?}");
        assert!(!printed.contains("ghp_flag"));
        assert!(!printed.contains("ghs_env"));
    }

    #[test]
    fn test_invalid_repository_flag() {
        let err = Settings::resolve(&cli(&["--repository", "nope"]), &actions_env()).unwrap_err();
        assert!(err.to_string().contains("expected owner/repo"));
    }

    #[test]
    fn test_missing_issue_number() {
        let env = ActionsEnvironment {
            issue_number: None,
            ..actions_env()
        };
        let err = Settings::resolve(&cli(&[]), &env).unwrap_err();
        assert!(err.to_string().contains("Pull request number is unknown"));
    }

    #[test]
    fn test_missing_repository() {
        let err = Settings::resolve(&cli(&[]), &ActionsEnvironment {
            token: Some("t".into()),
            issue_number: Some(1),
            ..ActionsEnvironment::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Repository is unknown"));
    }
}
