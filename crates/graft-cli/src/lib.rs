//! Command-line runtime for the graft structural rewriting tool.
//!
//! `graft` reads a `before` and an `after` snippet, prepares one rewrite
//! rule per language, and applies it to every file named on the command
//! line. The runtime is exercised both from the binary entrypoint and from
//! tests, where configuration loading and IO streams can be substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod batch;
mod cli;
mod config;
mod dump;
mod errors;
mod telemetry;

use batch::Batch;
use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, prepare_cli_arguments, split_config_arguments};
pub(crate) use errors::AppError;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `graft_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--capture-marker",
];

/// Runs the CLI using the provided arguments and IO handles.
///
/// Returns `0` on success, `1` on usage, configuration, I/O or rewrite
/// errors, and `2` when `--check` finds a file that would change.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(prepare_cli_arguments(&args, &split)) {
        Ok(cli) => cli,
        // Help and version requests.
        Err(error) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => return fail(stderr, &AppError::CliUsage(error)),
    };

    let prepared = loader
        .load(&split.config_arguments)
        .and_then(|config| {
            telemetry::initialise(&config)?;
            Ok(config)
        })
        .and_then(|config| Batch::new(&cli, &config));

    match prepared {
        Ok(mut batch) => {
            let summary = batch.run(&cli.files, stdout, stderr);
            summary.exit_code(batch.mode())
        }
        Err(error) => fail(stderr, &error),
    }
}

fn fail<E: Write>(stderr: &mut E, error: &AppError) -> ExitCode {
    let _ = writeln!(stderr, "{error}");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests;
