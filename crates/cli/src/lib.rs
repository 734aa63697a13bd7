//! hyf-autograde command line interface.
//!
//! Wires the GitHub platform client and the Actions environment into the
//! grade publisher from `autograde-core`, and sets up logging.

/// Workflow-command tracing layer.
pub mod annotations;
/// CLI argument parsing and exit codes.
pub mod cli;
/// Command execution.
pub mod run;
/// Tracing and logging configuration.
pub mod tracing;
