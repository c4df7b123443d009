//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use graft_syntax::{SupportedLanguage, SyntaxError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot detect the language of {}; pass --language", path.display())]
    UnknownLanguage { path: PathBuf },
    #[error("invalid rewrite rule for {language}: {source}")]
    Prepare {
        language: SupportedLanguage,
        source: SyntaxError,
    },
    #[error("{}: {source}", path.display())]
    Rewrite { path: PathBuf, source: SyntaxError },
    #[error("failed to write output: {0}")]
    Output(io::Error),
}
