//! Error types for hyf-autograde

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for autograde operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Grade files are missing, unreadable or malformed
    #[error("Failed to load {}: {message}", .path.display())]
    #[diagnostic(
        code(autograde::load),
        help("The grading step must write .hyf/score.json and .hyf/test-output.txt")
    )]
    Load {
        /// The file that could not be loaded
        path: Box<Path>,
        /// Underlying cause
        message: String,
    },

    /// Listing the comments of an issue failed
    #[error("Failed to list comments on #{issue}: {message}")]
    #[diagnostic(code(autograde::list))]
    List {
        /// Issue or pull request number
        issue: u64,
        /// Underlying cause
        message: String,
    },

    /// Minimizing a single comment failed
    #[error("Could not minimize comment {comment_id}: {message}")]
    #[diagnostic(code(autograde::minimize))]
    Minimize {
        /// REST id of the comment
        comment_id: u64,
        /// Underlying cause
        message: String,
    },

    /// Posting the new comment failed
    #[error("Failed to post comment on #{issue}: {message}")]
    #[diagnostic(code(autograde::post))]
    Post {
        /// Issue or pull request number
        issue: u64,
        /// Underlying cause
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(autograde::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl Error {
    /// Create a load error for `path`
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into().into_boxed_path(),
            message: message.into(),
        }
    }

    /// Create a list error
    pub fn list(issue: u64, message: impl Into<String>) -> Self {
        Self::List {
            issue,
            message: message.into(),
        }
    }

    /// Create a minimize error
    pub fn minimize(comment_id: u64, message: impl Into<String>) -> Self {
        Self::Minimize {
            comment_id,
            message: message.into(),
        }
    }

    /// Create a post error
    pub fn post(issue: u64, message: impl Into<String>) -> Self {
        Self::Post {
            issue,
            message: message.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Whether this error came from talking to the remote platform
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::List { .. } | Self::Minimize { .. } | Self::Post { .. }
        )
    }
}

/// Result type for autograde operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_includes_path_and_cause() {
        let err = Error::load("/tmp/work/.hyf/score.json", "expected value at line 1 column 1");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/work/.hyf/score.json"));
        assert!(msg.contains("expected value at line 1 column 1"));
    }

    #[test]
    fn test_remote_classification() {
        assert!(Error::list(1, "boom").is_remote());
        assert!(Error::post(1, "boom").is_remote());
        assert!(Error::minimize(7, "boom").is_remote());
        assert!(!Error::configuration("no token").is_remote());
        assert!(!Error::load("score.json", "missing").is_remote());
    }

    #[test]
    fn test_configuration_with_help() {
        let err = Error::configuration_with_help("GITHUB_TOKEN is not set", "Pass --token");
        match err {
            Error::Configuration { message, help } => {
                assert_eq!(message, "GITHUB_TOKEN is not set");
                assert_eq!(help.as_deref(), Some("Pass --token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
