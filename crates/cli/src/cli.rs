use crate::tracing::{LogLevel, TracingFormat};
use autograde_core::Error;
use clap::Parser;
use miette::{Diagnostic, Report};
use secrecy::SecretString;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Remote platform error exit code
pub const EXIT_REMOTE: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(hyf_autograde::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// GitHub API error (exit code 3)
    #[error("GitHub API error: {message}")]
    #[diagnostic(code(hyf_autograde::cli::remote))]
    Remote {
        /// The error message
        message: String,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(hyf_autograde::cli::other))]
    Other {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Convert `autograde_core::Error` to the matching `CliError` variant.
impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        match err {
            // Extract just the message to avoid "Configuration error: Configuration error:"
            Error::Configuration { message, help } => Self::Config { message, help },
            Error::List { .. } | Error::Minimize { .. } | Error::Post { .. } => Self::Remote {
                message: err.to_string(),
            },
            Error::Load { .. } => Self::other(err.to_string()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Remote { .. } | CliError::Other { .. } => EXIT_REMOTE,
    }
}

/// Render an error for humans on stderr
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    // Ensure output is flushed before potential process exit
    let _ = io::stderr().flush();
}

/// Post the auto grade of a pull request as a comment.
///
/// Reads `.hyf/score.json` and `.hyf/test-output.txt` from the working
/// directory, hides grade comments from earlier runs and posts a fresh one.
/// Inside GitHub Actions the repository, pull request number and token are
/// taken from the runner environment.
#[derive(Parser, Debug)]
#[command(name = "hyf-autograde")]
#[command(version)]
pub struct Cli {
    /// Directory containing the `.hyf` folder
    #[arg(long, short = 'C', env = "HYF_WORKDIR", value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// GitHub token [default: $GITHUB_TOKEN]
    #[arg(long, value_parser = parse_secret)]
    pub token: Option<SecretString>,

    /// Repository as owner/repo [default: $GITHUB_REPOSITORY]
    #[arg(long, value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// Pull request or issue number [default: from the event payload]
    #[arg(long, env = "HYF_ISSUE_NUMBER", value_name = "N")]
    pub issue: Option<u64>,

    /// GitHub API base URL [default: $GITHUB_API_URL]
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Maximum number of comment pages (100 comments each) to scan
    #[arg(long, env = "HYF_MAX_PAGES", default_value_t = autograde_github::client::DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Print the comment instead of posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(short = 'L', long, default_value = "info", value_enum)]
    pub log_level: LogLevel,

    /// Log output format [default: github inside GitHub Actions, compact otherwise]
    #[arg(long, value_enum)]
    pub log_format: Option<TracingFormat>,
}

fn parse_secret(value: &str) -> Result<SecretString, std::convert::Infallible> {
    Ok(SecretString::from(value))
}

/// Parse command line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["hyf-autograde"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(cli.log_format.is_none());
        assert!(!cli.dry_run);
        assert!(cli.token.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "hyf-autograde",
            "-C",
            "/work",
            "--repository",
            "HackYourFuture/Assignments",
            "--issue",
            "42",
            "--max-pages",
            "3",
            "--dry-run",
            "--log-format",
            "json",
            "-L",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.workdir, Some(PathBuf::from("/work")));
        assert_eq!(cli.repository.as_deref(), Some("HackYourFuture/Assignments"));
        assert_eq!(cli.issue, Some(42));
        assert_eq!(cli.max_pages, 3);
        assert!(cli.dry_run);
        assert_eq!(cli.log_format, Some(TracingFormat::Json));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_token_is_redacted() {
        let cli = Cli::try_parse_from(["hyf-autograde", "--token", "ghp_from_flag"]).unwrap();
        assert!(!format!("{cli:?}").contains("ghp_from_flag"));
    }

    #[test]
    fn test_cli_rejects_bad_issue() {
        assert!(Cli::try_parse_from(["hyf-autograde", "--issue", "abc"]).is_err());
    }

    #[test]
    fn test_error_mapping() {
        let config: CliError = Error::configuration("GITHUB_TOKEN is not set").into();
        assert_eq!(exit_code_for(&config), EXIT_CLI);
        assert_eq!(
            config.to_string(),
            "CLI/configuration error: GITHUB_TOKEN is not set"
        );

        let remote: CliError = Error::post(7, "Server Error").into();
        assert_eq!(exit_code_for(&remote), EXIT_REMOTE);
        assert!(remote.to_string().contains("Failed to post comment on #7"));

        let list: CliError = Error::list(7, "Bad credentials").into();
        assert!(matches!(list, CliError::Remote { .. }));
    }
}
