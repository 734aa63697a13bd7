//! Core of hyf-autograde.
//!
//! Turns the artifacts of a grading step into a pull request comment:
//! - [`result`] loads `.hyf/score.json` and `.hyf/test-output.txt`
//! - [`comment`] renders the markdown body
//! - [`matcher`] and [`minimize`] find and hide comments from earlier runs
//! - [`publisher`] runs the whole sequence against a [`PlatformClient`]
//!
//! Platform access is abstracted behind [`PlatformClient`]; the GitHub
//! implementation lives in `autograde-github`.

pub mod comment;
pub mod error;
pub mod matcher;
pub mod minimize;
pub mod platform;
pub mod publisher;
pub mod result;

pub use error::{Error, Result};
pub use minimize::{MinimizeOutcome, MinimizeReport};
pub use platform::{CommentAuthor, CommentRecord, IssueContext, PlatformClient, PostedComment};
pub use publisher::{PublishOutcome, Publisher};
pub use result::{GradeResult, ScoreRecord, load_results};
