//! CLI entry point for the idiograph extraction driver.
//!
//! Parses command-line arguments with clap, runs the decomposition pipeline,
//! renders the summary to stdout, and maps errors to appropriate exit codes.
//! Logging is initialized eagerly so subsequent operations can emit
//! structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use idiograph_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the summary, and flush
/// the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, graph_code, policy_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => {
                    Some((Some(core.code()), core.graph_code(), core.policy_code()))
                }
                _ => None,
            })
            .unwrap_or((None, None, None));

        let code_field = code.map(|code| field::display(code.as_str()));
        let graph_code_field = graph_code.map(|code| field::display(code.as_str()));
        let policy_code_field = policy_code.map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code = code_field,
            graph_code = graph_code_field,
            policy_code = policy_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Emit a one-off diagnostic before tracing is initialized.
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
