//! Language detection, Tree-sitter grammar selection and per-language kind
//! tables.
//!
//! This module provides the [`SupportedLanguage`] enum for identifying
//! programming languages and mapping them to their Tree-sitter grammars,
//! together with the node kinds the rest of the crate treats specially:
//! identifier-like leaves (capture candidates), atomic kinds kept as a single
//! text leaf, and the brace-delimited containers the printer lays out one
//! child per line.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::parser::GrammarContext;
use crate::pattern::CaptureRule;

/// Languages supported for structural rewriting.
///
/// Each variant maps to a Tree-sitter grammar that can parse source code
/// for that language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    #[default]
    Rust,
    /// TypeScript source files (`.ts`, `.tsx`).
    TypeScript,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "rs" => Some(Self::Rust),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Detects the language from a file path by examining its extension.
    ///
    /// Returns `None` if the path has no extension or the extension is not
    /// recognised.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            // Use a TSX-capable grammar so `.tsx` is parsed correctly.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }

    /// Returns all supported languages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Rust, Self::TypeScript]
    }

    /// Kinds of identifier-like leaves; these carry a `Name` and may be
    /// captures.
    #[must_use]
    pub const fn identifier_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &[
                "identifier",
                "type_identifier",
                "field_identifier",
                "shorthand_field_identifier",
            ],
            Self::TypeScript => &[
                "identifier",
                "property_identifier",
                "type_identifier",
                "shorthand_property_identifier",
                "shorthand_property_identifier_pattern",
            ],
        }
    }

    /// Kinds whose whole source text becomes a single `Text` leaf.
    #[must_use]
    pub const fn atomic_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &[
                "line_comment",
                "block_comment",
                "string_literal",
                "raw_string_literal",
                "char_literal",
            ],
            Self::TypeScript => &["comment", "string", "template_string", "regex"],
        }
    }

    /// Brace-delimited containers laid out one child per line.
    #[must_use]
    pub const fn block_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &[
                "block",
                "declaration_list",
                "field_declaration_list",
                "enum_variant_list",
                "match_block",
            ],
            Self::TypeScript => &[
                "statement_block",
                "class_body",
                "interface_body",
                "enum_body",
                "switch_body",
                "object_type",
            ],
        }
    }

    /// The kind of a whole-file tree.
    #[must_use]
    pub const fn root_kind(self) -> &'static str {
        match self {
            Self::Rust => "source_file",
            Self::TypeScript => "program",
        }
    }

    /// The kind wrapping an expression used as a statement.
    #[must_use]
    pub const fn expression_statement_kind(self) -> &'static str {
        "expression_statement"
    }

    /// Returns whether `kind` is an identifier-like leaf kind.
    #[must_use]
    pub fn is_identifier_kind(self, kind: &str) -> bool {
        self.identifier_kinds().iter().any(|candidate| *candidate == kind)
    }

    /// Returns whether `kind` is kept as a single text leaf.
    #[must_use]
    pub fn is_atomic_kind(self, kind: &str) -> bool {
        self.atomic_kinds().iter().any(|candidate| *candidate == kind)
    }

    /// Returns whether a leaf of `kind` keeps its trailing whitespace.
    ///
    /// Whitespace inside JSX text is rendered content.
    #[must_use]
    pub fn keeps_trailing_whitespace(self, kind: &str) -> bool {
        matches!((self, kind), (Self::TypeScript, "jsx_text"))
    }

    /// Returns whether `kind` is laid out as a block.
    #[must_use]
    pub fn is_block_kind(self, kind: &str) -> bool {
        self.block_kinds().iter().any(|candidate| *candidate == kind)
    }

    /// Builds the capture rule for this language with the given marker.
    #[must_use]
    pub fn capture_rule(self, marker: &str) -> CaptureRule {
        CaptureRule::new(marker, self.identifier_kinds().iter().copied())
    }

    /// Returns whether a node accepted by the type context really reads as
    /// a type.
    ///
    /// Both grammars accept plenty of expressions as types. Rust only allows
    /// parenthesised arguments on the `Fn` traits, so `f(x)` is a call even
    /// though the grammar accepts it as a function type. Plain and qualified
    /// type names only count when their last segment is cased like a type
    /// (`Vec`, `io::Error`, `T`): `items.length`, `std::u32::MAX` and `len`
    /// resolve as expressions instead. A lower-case user type such as
    /// `c_int` therefore cannot be matched from a bare snippet; wrap it in a
    /// larger type (`*const c_int`) to keep it in the type context.
    pub(crate) fn is_plausible_type(self, node: tree_sitter::Node<'_>, source: &str) -> bool {
        let text = move |node: tree_sitter::Node<'_>| source.get(node.byte_range());
        match (self, node.kind()) {
            (Self::Rust, "function_type") => node
                .child_by_field_name("trait")
                .and_then(text)
                .and_then(|name| name.rsplit("::").next())
                .is_none_or(|name| matches!(name, "Fn" | "FnMut" | "FnOnce")),
            (Self::Rust, "type_identifier" | "scoped_type_identifier")
            | (Self::TypeScript, "type_identifier" | "nested_type_identifier") => text(node)
                .and_then(|path| path.rsplit([':', '.']).next())
                .is_some_and(is_cased_like_type),
            _ => true,
        }
    }

    /// Returns how a snippet is embedded and recovered under `context`.
    pub(crate) const fn wrapper(self, context: GrammarContext) -> Wrapper {
        match (self, context) {
            (Self::Rust, GrammarContext::Type) => Wrapper::node(
                "type __GraftFragment = ",
                ";",
                &[Step::FirstNamed, Step::Field("type")],
            ),
            (Self::Rust, GrammarContext::Expression) => Wrapper::node(
                "const __GRAFT_FRAGMENT: () = ",
                ";",
                &[Step::FirstNamed, Step::Field("value")],
            ),
            (Self::Rust, GrammarContext::StatementList) => Wrapper::body(
                "fn __graft_fragment() {\n",
                "\n}",
                &[Step::FirstNamed, Step::Field("body")],
            ),
            (Self::TypeScript, GrammarContext::Type) => Wrapper::node(
                "type __GraftFragment = ",
                ";",
                &[Step::FirstNamed, Step::Field("value")],
            ),
            (Self::TypeScript, GrammarContext::Expression) => Wrapper::node(
                "const __graftFragment = ",
                ";",
                &[Step::FirstNamed, Step::FirstNamed, Step::Field("value")],
            ),
            (Self::TypeScript, GrammarContext::StatementList) => Wrapper::body(
                "function __graftFragment() {\n",
                "\n}",
                &[Step::FirstNamed, Step::Field("body")],
            ),
            (_, GrammarContext::DeclarationList) => Wrapper {
                prefix: "",
                suffix: "",
                path: &[],
                extract: Extract::Children { braces: false },
            },
        }
    }
}

/// `Vec`, `T` and `HTTPClient` read as types; `len` and `MAX` do not.
fn is_cased_like_type(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(char::is_uppercase)
        && (name.chars().count() == 1 || chars.any(char::is_lowercase))
}

/// One step from a wrapper's root towards the embedded fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The first named child.
    FirstNamed,
    /// The child stored under a grammar field.
    Field(&'static str),
}

/// What to take from the node a wrapper's path leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extract {
    /// The node itself, which must span the snippet exactly.
    Node,
    /// The node's children, optionally without the enclosing braces.
    Children {
        /// Whether the first and last children are braces to drop.
        braces: bool,
    },
}

/// Source template and extraction path for one grammatical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Wrapper {
    pub(crate) prefix: &'static str,
    pub(crate) suffix: &'static str,
    pub(crate) path: &'static [Step],
    pub(crate) extract: Extract,
}

impl Wrapper {
    const fn node(prefix: &'static str, suffix: &'static str, path: &'static [Step]) -> Self {
        Self {
            prefix,
            suffix,
            path,
            extract: Extract::Node,
        }
    }

    const fn body(prefix: &'static str, suffix: &'static str, path: &'static [Step]) -> Self {
        Self {
            prefix,
            suffix,
            path,
            extract: Extract::Children { braces: true },
        }
    }

    /// Embeds `text` in the template.
    pub(crate) fn wrap(&self, text: &str) -> String {
        format!("{}{text}{}", self.prefix, self.suffix)
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a language identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}
