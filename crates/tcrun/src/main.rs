//! tcrun CLI Application

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, Write};
use tcrun::cli::{self, exit_code_for, render_error};
use tcrun::tracing::{self, TracingConfig};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
    };
    if let Err(e) = tracing::init_tracing(tracing_config) {
        eprintln!("Warning: {e}");
    }

    let json = cli.json;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let exit_code = match tcrun::run(cli, &mut out) {
        Ok(code) => code,
        Err(err) => {
            let _ = out.flush();
            render_error(&err, json);
            exit_code_for(&err)
        }
    };
    let _ = out.flush();
    drop(out);

    std::process::exit(exit_code);
}
