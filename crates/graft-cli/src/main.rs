//! CLI entrypoint for the graft structural rewriting tool.
//!
//! The binary delegates to [`graft_cli::run`], which loads configuration,
//! parses command-line arguments, and rewrites the requested files.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    graft_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
