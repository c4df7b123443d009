//! Applies one rewrite rule across a batch of files.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use graft_config::Config;
use graft_syntax::{
    DiagnosticSink, NoopSink, RewriteOptions, RewriteRule, Rewriter, SupportedLanguage,
    TracingSink,
};
use tracing::{Level, debug, enabled, info};

use crate::AppError;
use crate::cli::{Cli, OutputMode};
use crate::dump::DumpSink;

/// Exit status reported when any file failed.
const FAILED: u8 = 1;

/// Exit status reported by `--check` when some file would change.
const CHECK_FAILED: u8 = 2;

/// Per-run tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) files: usize,
    pub(crate) changed: usize,
    pub(crate) failed: usize,
}

impl Summary {
    /// Failures win over `--check` findings.
    pub(crate) fn exit_status(self, mode: OutputMode) -> u8 {
        if self.failed > 0 {
            FAILED
        } else if mode == OutputMode::Check && self.changed > 0 {
            CHECK_FAILED
        } else {
            0
        }
    }

    pub(crate) fn exit_code(self, mode: OutputMode) -> ExitCode {
        ExitCode::from(self.exit_status(mode))
    }
}

/// The snippets, options and per-language rules for one invocation.
pub(crate) struct Batch {
    before: String,
    after: String,
    options: RewriteOptions,
    language: Option<SupportedLanguage>,
    dump_dir: Option<PathBuf>,
    mode: OutputMode,
    rules: BTreeMap<SupportedLanguage, RewriteRule>,
}

impl Batch {
    /// Reads both snippets and, when the language is fixed, prepares the
    /// rule up front so snippet errors surface before any file is touched.
    pub(crate) fn new(cli: &Cli, config: &Config) -> Result<Self, AppError> {
        let before = read(&cli.before)?;
        let after = read(&cli.after)?;
        let sink: Arc<dyn DiagnosticSink> = match &cli.dump_dir {
            Some(dir) => Arc::new(DumpSink::new(dir.clone())),
            None if enabled!(target: "graft_syntax::diagnostics", Level::DEBUG) => {
                Arc::new(TracingSink)
            }
            None => Arc::new(NoopSink),
        };
        let options = RewriteOptions::new()
            .with_capture_marker(config.capture_marker())
            .with_sink(sink);

        let mut batch = Self {
            before,
            after,
            options,
            language: cli.language,
            dump_dir: cli.dump_dir.clone(),
            mode: cli.output_mode(),
            rules: BTreeMap::new(),
        };
        if let Some(language) = batch.language {
            batch.rule_for(language)?;
        }
        Ok(batch)
    }

    pub(crate) const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Rewrites every file, reporting failures on `stderr` and carrying on
    /// with the rest.
    pub(crate) fn run<W, E>(
        &mut self,
        files: &[PathBuf],
        stdout: &mut W,
        stderr: &mut E,
    ) -> Summary
    where
        W: Write,
        E: Write,
    {
        let mut summary = Summary::default();
        for path in files {
            summary.files += 1;
            match self.process(path, stdout) {
                Ok(true) => summary.changed += 1,
                Ok(false) => {}
                Err(error) => {
                    let _ = writeln!(stderr, "{error}");
                    summary.failed += 1;
                }
            }
        }
        info!(
            files = summary.files,
            changed = summary.changed,
            failed = summary.failed,
            "batch finished"
        );
        summary
    }

    /// Rewrites one file; returns whether the rule matched anywhere.
    fn process<W: Write>(&mut self, path: &Path, stdout: &mut W) -> Result<bool, AppError> {
        let mode = self.mode;
        let language = self.language_for(path)?;
        let source = read(path)?;
        let rewriter = Rewriter::with_options(language, self.file_options(path));
        let rule = self.rule_for(language)?;

        let result = rewriter
            .apply(rule, &source)
            .map_err(|source_error| AppError::Rewrite {
                path: path.to_path_buf(),
                source: source_error,
            })?;
        let changed = result.has_changes();
        info!(
            path = %path.display(),
            %language,
            replacements = result.num_replacements(),
            "processed file"
        );

        match mode {
            OutputMode::Stdout => stdout
                .write_all(result.output().as_bytes())
                .map_err(AppError::Output)?,
            OutputMode::Check if changed => {
                writeln!(stdout, "{}", path.display()).map_err(AppError::Output)?;
            }
            OutputMode::InPlace if changed => {
                fs::write(path, result.output()).map_err(|error| AppError::Write {
                    path: path.to_path_buf(),
                    source: error,
                })?;
            }
            OutputMode::Check | OutputMode::InPlace => {}
        }
        Ok(changed)
    }

    fn language_for(&self, path: &Path) -> Result<SupportedLanguage, AppError> {
        self.language
            .or_else(|| SupportedLanguage::from_path(path))
            .ok_or_else(|| AppError::UnknownLanguage {
                path: path.to_path_buf(),
            })
    }

    fn file_options(&self, path: &Path) -> RewriteOptions {
        match &self.dump_dir {
            Some(dir) => self
                .options
                .clone()
                .with_sink(Arc::new(DumpSink::for_file(dir.clone(), path))),
            None => self.options.clone(),
        }
    }

    fn rule_for(&mut self, language: SupportedLanguage) -> Result<&RewriteRule, AppError> {
        match self.rules.entry(language) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let rule = Rewriter::with_options(language, self.options.clone())
                    .prepare(&self.before, &self.after)
                    .map_err(|source| AppError::Prepare { language, source })?;
                debug!(%language, shape = ?rule.shape(), "rule prepared");
                Ok(&*entry.insert(rule))
            }
        }
    }
}

fn read(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}
