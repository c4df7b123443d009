//! Example-driven structural rewriting for the graft toolchain.
//!
//! A rewrite is described by two example snippets: the code to find
//! (`before`) and the code to put in its place (`after`). Identifiers whose
//! name starts with the capture marker (`X` by default) stand for whatever
//! subtree appears in their position.
//!
//! The crate is layered bottom-up:
//!
//! - [`Node`] is the generic tree every other component works on.
//! - [`PatternCompiler`] turns a concrete tree into a [`Pattern`].
//! - [`Pattern::check`] matches a pattern against a tree, binding captures
//!   into an [`Environment`]; [`Pattern::construct`] rebuilds a tree from
//!   the bindings.
//! - Window patterns match a fixed-length run of elements anywhere inside a
//!   longer array, once ([`WindowMode::Single`]) or at every
//!   non-overlapping position ([`WindowMode::Multi`]).
//! - [`Rewriter`] ties snippet parsing, matching, construction and
//!   printing together.
//!
//! Source text enters through a [`FragmentParser`] (Tree-sitter backed
//! [`Parser`]) and leaves through a [`Printer`] ([`CanonicalPrinter`]).
//!
//! # Supported Languages
//!
//! - Rust (`.rs`)
//! - TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`)
//!
//! # Example
//!
//! ```
//! use graft_syntax::{Rewriter, SupportedLanguage};
//!
//! let rewriter = Rewriter::new(SupportedLanguage::Rust);
//! let rule = rewriter.prepare("let (Xa, Xb) = Xcall();", "let (Xb, Xa) = Xcall();")?;
//! let result = rewriter.apply(&rule, "fn main() { let (a, b) = f(); }")?;
//!
//! assert_eq!(result.num_replacements(), 1);
//! assert_eq!(result.output(), "fn main() {\n    let (b, a) = f();\n}\n");
//! # Ok::<(), graft_syntax::SyntaxError>(())
//! ```

mod diagnostics;
mod environment;
mod error;
mod language;
mod matcher;
mod node;
mod parser;
mod pattern;
mod position;
mod printer;
mod rewriter;

pub use diagnostics::{DiagnosticSink, NoopSink, TracingSink, to_pretty_json};
pub use environment::{Environment, WindowSlot};
pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use matcher::{MatchResult, Matcher};
pub use node::{
    CHILDREN_FIELD, KIND_FIELD, NAME_FIELD, Node, Object, POSITION_FIELD, Scalar, TEXT_FIELD,
};
pub use parser::{
    FragmentParser, GrammarContext, ParseResult, ParsedSnippet, Parser, SyntaxErrorInfo,
};
pub use pattern::{
    CaptureRule, DEFAULT_CAPTURE_MARKER, FieldPattern, Pattern, PatternCompiler, Window,
    WindowMode,
};
pub use printer::{CanonicalPrinter, Printer};
pub use rewriter::{RewriteOptions, RewriteResult, RewriteRule, Rewriter, RuleShape};
