//! CLI argument definitions for graft.

use std::path::PathBuf;

use clap::Parser;
use graft_syntax::SupportedLanguage;

/// Rewrites source files from a pair of example snippets.
///
/// Identifiers starting with the capture marker (`X` by default) in the
/// `--before` snippet match any subtree; the same identifiers in the
/// `--after` snippet are replaced by whatever they matched.
#[derive(Parser, Debug)]
#[command(name = "graft", version)]
pub(crate) struct Cli {
    /// File holding the snippet to search for.
    #[arg(long, value_name = "FILE")]
    pub(crate) before: PathBuf,
    /// File holding the replacement snippet.
    #[arg(long, value_name = "FILE")]
    pub(crate) after: PathBuf,
    /// Language of every input file; detected from each file's extension
    /// when omitted.
    #[arg(long, value_name = "LANG")]
    pub(crate) language: Option<SupportedLanguage>,
    /// Writes nothing and exits with status 2 if any file would change.
    #[arg(long, conflicts_with = "stdout")]
    pub(crate) check: bool,
    /// Prints rewritten sources instead of writing them back.
    #[arg(long)]
    pub(crate) stdout: bool,
    /// Directory receiving the intermediate trees as JSON.
    #[arg(long, value_name = "DIR")]
    pub(crate) dump_dir: Option<PathBuf>,
    /// Files to rewrite.
    #[arg(value_name = "FILE", required = true)]
    pub(crate) files: Vec<PathBuf>,
}

/// Where rewritten sources go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    /// Changed files are written back.
    InPlace,
    /// Every result is printed to stdout.
    Stdout,
    /// Nothing is written; changed paths are listed.
    Check,
}

impl Cli {
    pub(crate) const fn output_mode(&self) -> OutputMode {
        if self.check {
            OutputMode::Check
        } else if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::InPlace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("graft").chain(args.iter().copied()))
    }

    #[test]
    fn parses_full_invocation() {
        let cli = parse(&[
            "--before", "b.rs", "--after", "a.rs", "--language", "rust", "--check", "main.rs",
        ])
        .expect("parse");
        assert_eq!(cli.language, Some(SupportedLanguage::Rust));
        assert_eq!(cli.output_mode(), OutputMode::Check);
        assert_eq!(cli.files, vec![PathBuf::from("main.rs")]);
    }

    #[test]
    fn requires_files() {
        let err = parse(&["--before", "b.rs", "--after", "a.rs"]).expect_err("no files");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn check_conflicts_with_stdout() {
        let err = parse(&["--before", "b", "--after", "a", "--check", "--stdout", "f.rs"])
            .expect_err("conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = parse(&["--before", "b", "--after", "a", "--language", "cobol", "f"])
            .expect_err("bad language");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
