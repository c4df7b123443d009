//! Error types for parsing, pattern compilation, construction and printing.
//!
//! Structural mismatches are never errors: matching reports them as a plain
//! `false`. Everything here is a hard failure surfaced to the caller.

use thiserror::Error;

use crate::language::SupportedLanguage;

/// Errors from graft operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInitError {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The file extension is not supported.
    #[error("unsupported file extension: {extension}")]
    UnsupportedExtension {
        /// The extension that was not recognised.
        extension: String,
    },

    /// No grammatical context could parse the given text.
    #[error("failed to parse {language}: {message}")]
    ParseError {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// A snippet could not be turned into a usable pattern.
    #[error("invalid pattern for {language}: {message}")]
    PatternCompileError {
        /// The language the pattern was compiled for.
        language: SupportedLanguage,
        /// Description of the compilation failure.
        message: String,
    },

    /// A template references a capture the match never bound.
    #[error("template references unbound variable: {name}")]
    UnboundVariable {
        /// Name of the missing capture.
        name: String,
    },

    /// A template contains a wildcard, which has nothing to reconstruct.
    #[error("cannot construct a node from a wildcard")]
    ConstructFromWildcard,

    /// A window template was constructed without window match bookkeeping.
    #[error("window template has no {slot} bindings in the environment")]
    UnboundWindow {
        /// The window slot that was expected.
        slot: &'static str,
    },

    /// A node has a shape the operation cannot handle.
    #[error("unsupported node kind: {kind}")]
    UnsupportedNodeKind {
        /// Description of the offending node.
        kind: String,
    },

    /// The printer failed to render a tree.
    #[error("failed to render tree: {message}")]
    RenderError {
        /// Description of the failure.
        message: String,
    },

    /// A diagnostic sink failed to record a tree.
    #[error("diagnostic sink failed: {message}")]
    DiagnosticError {
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language,
            message: message.into(),
        }
    }

    /// Creates an unsupported extension error.
    #[must_use]
    pub fn unsupported_extension(extension: impl Into<String>) -> Self {
        Self::UnsupportedExtension {
            extension: extension.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParseError {
            language,
            message: message.into(),
        }
    }

    /// Creates a pattern compilation error.
    #[must_use]
    pub fn pattern_compile(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::PatternCompileError {
            language,
            message: message.into(),
        }
    }

    /// Creates an unbound variable error.
    #[must_use]
    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    /// Creates an unsupported node kind error.
    #[must_use]
    pub fn unsupported_node_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedNodeKind { kind: kind.into() }
    }

    /// Creates a render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Creates a diagnostic sink error.
    #[must_use]
    pub fn diagnostic(message: impl Into<String>) -> Self {
        Self::DiagnosticError {
            message: message.into(),
        }
    }
}
