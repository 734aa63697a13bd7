//! hyf-autograde binary.

// The panic hook and runtime failure run before tracing is available
#![allow(clippy::print_stderr)]

use autograde_github::{ActionsEnvironment, running_in_actions};
use hyf_autograde::cli::{self, exit_code_for, render_error};
use hyf_autograde::run::execute;
use hyf_autograde::tracing::{TracingConfig, TracingFormat, init_tracing};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let format = cli.log_format.unwrap_or(if running_in_actions() {
        TracingFormat::Github
    } else {
        TracingFormat::Compact
    });
    let tracing_config = TracingConfig {
        format,
        level: cli.log_level.into(),
        filter: None,
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("{e:?}");
    }

    // Detection logs about the event payload, so it runs once tracing is up
    let env = ActionsEnvironment::detect();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let exit_code = match rt.block_on(execute(&cli, &env)) {
        Ok(code) => code,
        Err(err) => {
            render_error(&err);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}
