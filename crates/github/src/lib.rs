//! GitHub provider for hyf-autograde.
//!
//! This crate provides:
//! - [`GitHubPlatformClient`], the octocrab-backed [`autograde_core::PlatformClient`]
//! - [`ActionsEnvironment`], detection of the GitHub Actions invocation context

#![warn(missing_docs)]

pub mod client;
pub mod context;

pub use client::{GitHubClientConfig, GitHubPlatformClient};
pub use context::{ActionsEnvironment, running_in_actions};
