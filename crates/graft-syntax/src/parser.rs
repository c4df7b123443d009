//! Tree-sitter parsing and the bridge into [`Node`] trees.
//!
//! This module wraps the raw Tree-sitter parser and provides structured
//! access to parse results and syntax errors. It also converts concrete
//! syntax trees into the generic [`Node`] representation and implements
//! [`FragmentParser`], which parses snippets under a chosen
//! [`GrammarContext`] by embedding them in a small wrapper program.

use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::error::SyntaxError;
use crate::language::{Extract, Step, SupportedLanguage};
use crate::node::{
    CHILDREN_FIELD, KIND_FIELD, NAME_FIELD, Node, Object, POSITION_FIELD, TEXT_FIELD,
};
use crate::position::{point_to_one_based, span_of};

/// Result of parsing source code.
///
/// Contains the parsed syntax tree along with metadata about any errors
/// encountered during parsing. Tree-sitter is error-tolerant, so a parse
/// result may contain both a valid tree and error nodes.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns whether the parse result contains any syntax errors.
    ///
    /// Tree-sitter produces ERROR nodes for portions of the source that
    /// could not be parsed according to the grammar.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Collects all syntax errors found in the parse result.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Converts the whole tree into a [`Node`].
    #[must_use]
    pub fn to_node(&self) -> Node {
        self.bridge().convert(self.root_node())
    }

    fn bridge(&self) -> Bridge<'_> {
        Bridge {
            language: self.language,
            source: &self.source,
        }
    }

    /// Fails with the first syntax error, if any.
    fn ensure_clean(&self, what: &str) -> Result<(), SyntaxError> {
        match self.errors().first() {
            None => Ok(()),
            Some(error) => Err(SyntaxError::parse(
                self.language,
                format!(
                    "{what}: {} at line {}, column {}",
                    error.message, error.line, error.column
                ),
            )),
        }
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let byte_range = node.byte_range();
        let context = source
            .get(byte_range.clone())
            .map(|s| {
                if s.len() > 50 {
                    let truncated: String = s.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    s.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        let (line, column) = point_to_one_based(node.start_position());

        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

/// Tree-sitter parser wrapper for a specific language.
///
/// Each parser instance is configured for a single language. Create multiple
/// parsers if you need to parse multiple languages.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code and returns the result.
    ///
    /// Tree-sitter is error-tolerant, so this method will return a parse
    /// result even if the source contains syntax errors. Use
    /// [`ParseResult::has_errors`] to check for errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails to produce a syntax tree.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

/// A grammatical context a snippet can be parsed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarContext {
    /// A type expression.
    Type,
    /// A single expression.
    Expression,
    /// A sequence of top-level items.
    DeclarationList,
    /// A sequence of statements inside a function body.
    StatementList,
}

impl GrammarContext {
    /// Contexts in the order snippets are tried.
    pub const FALLBACK_ORDER: [Self; 4] = [
        Self::Type,
        Self::Expression,
        Self::DeclarationList,
        Self::StatementList,
    ];

    /// Returns the context name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Expression => "expression",
            Self::DeclarationList => "declaration list",
            Self::StatementList => "statement list",
        }
    }

    /// Whether fragments parsed in this context are a single node rather
    /// than an array of nodes.
    #[must_use]
    pub const fn is_singular(self) -> bool {
        matches!(self, Self::Type | Self::Expression)
    }
}

impl fmt::Display for GrammarContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snippet parsed under the first context that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnippet {
    /// The context that parsed the snippet.
    pub context: GrammarContext,
    /// The snippet's tree: one node for singular contexts, an array
    /// otherwise.
    pub node: Node,
}

/// Converts source text into [`Node`] trees.
pub trait FragmentParser {
    /// The language this parser handles.
    fn language(&self) -> SupportedLanguage;

    /// Parses `text` under one grammatical context.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] if the context does not accept
    /// the text.
    fn parse_fragment(&mut self, text: &str, context: GrammarContext) -> Result<Node, SyntaxError>;

    /// Parses a whole source file into its root node.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] if the source has syntax errors.
    fn parse_source(&mut self, text: &str) -> Result<Node, SyntaxError>;

    /// Parses a snippet under each context of
    /// [`GrammarContext::FALLBACK_ORDER`], keeping the first success.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] if no context accepts the text.
    fn parse_snippet(&mut self, text: &str) -> Result<ParsedSnippet, SyntaxError> {
        let mut rejections = Vec::new();
        for context in GrammarContext::FALLBACK_ORDER {
            match self.parse_fragment(text, context) {
                Ok(node) => {
                    debug!(%context, "snippet parsed");
                    return Ok(ParsedSnippet { context, node });
                }
                Err(err) => rejections.push(format!("{context}: {err}")),
            }
        }
        Err(SyntaxError::parse(
            self.language(),
            format!("no context accepts the snippet ({})", rejections.join("; ")),
        ))
    }
}

impl FragmentParser for Parser {
    fn language(&self) -> SupportedLanguage {
        self.language
    }

    fn parse_fragment(&mut self, text: &str, context: GrammarContext) -> Result<Node, SyntaxError> {
        let snippet = text.trim();
        let wrapper = self.language.wrapper(context);
        let parsed = self.parse(&wrapper.wrap(snippet))?;
        parsed.ensure_clean(context.as_str())?;

        let mut target = parsed.root_node();
        for step in wrapper.path {
            let mut cursor = target.walk();
            let next = match step {
                Step::FirstNamed => target.named_children(&mut cursor).next(),
                Step::Field(name) => target.child_by_field_name(name),
            };
            target = next.ok_or_else(|| {
                SyntaxError::parse(self.language, format!("{context}: fragment not found"))
            })?;
        }

        let bridge = parsed.bridge();
        match wrapper.extract {
            Extract::Node => {
                let start = wrapper.prefix.len();
                if target.byte_range() != (start..start.saturating_add(snippet.len())) {
                    return Err(SyntaxError::parse(
                        self.language,
                        format!("{context}: fragment does not span the snippet"),
                    ));
                }
                if context == GrammarContext::Type
                    && !self.language.is_plausible_type(target, parsed.source())
                {
                    return Err(SyntaxError::parse(
                        self.language,
                        format!("{context}: snippet reads as an expression"),
                    ));
                }
                Ok(bridge.convert(target))
            }
            Extract::Children { braces } => {
                let mut cursor = target.walk();
                let mut children: Vec<_> = target.children(&mut cursor).collect();
                if braces {
                    if children.first().is_some_and(|child| child.kind() == "{") {
                        children.remove(0);
                    }
                    if children.last().is_some_and(|child| child.kind() == "}") {
                        children.pop();
                    }
                }
                Ok(Node::Array(
                    children.into_iter().map(|child| bridge.convert(child)).collect(),
                ))
            }
        }
    }

    fn parse_source(&mut self, text: &str) -> Result<Node, SyntaxError> {
        let parsed = self.parse(text)?;
        parsed.ensure_clean("source")?;
        Ok(parsed.to_node())
    }
}

/// Converts Tree-sitter nodes into [`Node`] objects.
///
/// Every node becomes an object with `Kind` and `Pos`, followed by `Name`
/// for identifier-like leaves, `Text` for other leaves and atomic kinds, or
/// `Children` holding every child, named and anonymous, in source order.
struct Bridge<'s> {
    language: SupportedLanguage,
    source: &'s str,
}

impl Bridge<'_> {
    fn convert(&self, node: tree_sitter::Node<'_>) -> Node {
        let kind = node.kind();
        let mut object = Object::new()
            .with(KIND_FIELD, kind)
            .with(POSITION_FIELD, span_of(node));

        let text = self.source.get(node.byte_range()).unwrap_or_default();
        if self.language.is_identifier_kind(kind) {
            object.insert(NAME_FIELD, text);
        } else if node.child_count() == 0 || self.language.is_atomic_kind(kind) {
            let leaf = if self.language.keeps_trailing_whitespace(kind) {
                text
            } else {
                text.trim_end()
            };
            object.insert(TEXT_FIELD, leaf);
        } else {
            let mut cursor = node.walk();
            let children = node
                .children(&mut cursor)
                .map(|child| self.convert(child))
                .collect();
            object.insert(CHILDREN_FIELD, Node::Array(children));
        }

        Node::Object(object)
    }
}

/// Recursively checks if a node or any of its descendants is an ERROR node.
fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

/// Recursively collects all ERROR nodes from a syntax tree.
fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parser(language: SupportedLanguage) -> Parser {
        Parser::new(language).expect("parser init")
    }

    fn kinds(node: &Node) -> Vec<&str> {
        node.as_array()
            .expect("array")
            .iter()
            .filter_map(Node::kind)
            .collect()
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn main() {}")]
    #[case(
        SupportedLanguage::TypeScript,
        "function hello(): string { return 'hi'; }"
    )]
    fn parser_parses_valid_source(#[case] language: SupportedLanguage, #[case] source: &str) {
        let result = parser(language).parse(source).expect("parse");

        assert!(!result.has_errors());
        assert_eq!(result.language(), language);
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn broken() {")]
    #[case(SupportedLanguage::TypeScript, "function broken( {")]
    fn parser_detects_syntax_errors(#[case] language: SupportedLanguage, #[case] source: &str) {
        let result = parser(language).parse(source).expect("parse");

        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[test]
    fn syntax_error_info_has_line_and_column() {
        let result = parser(SupportedLanguage::Rust)
            .parse("fn test() {\n    let x = \n}")
            .expect("parse");

        let errors = result.errors();
        let first_error = errors.first().expect("has error");
        assert!(first_error.line >= 1);
        assert!(first_error.column >= 1);
    }

    #[test]
    fn bridge_emits_kind_position_and_name() {
        let node = parser(SupportedLanguage::Rust)
            .parse_fragment("answer", GrammarContext::Expression)
            .expect("expression");
        let object = node.as_object().expect("object");

        let fields: Vec<_> = object.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, vec![KIND_FIELD, POSITION_FIELD, NAME_FIELD]);
        assert_eq!(object.get_str(KIND_FIELD), Some("identifier"));
        assert_eq!(object.get_str(NAME_FIELD), Some("answer"));
    }

    #[test]
    fn bridge_keeps_anonymous_children() {
        let node = parser(SupportedLanguage::Rust)
            .parse_fragment("f(1)", GrammarContext::Expression)
            .expect("expression");
        assert_eq!(node.kind(), Some("call_expression"));

        let arguments = node
            .as_object()
            .and_then(|object| object.get(CHILDREN_FIELD))
            .and_then(Node::as_array)
            .and_then(|children| children.get(1))
            .and_then(Node::as_object)
            .and_then(|object| object.get(CHILDREN_FIELD))
            .expect("arguments children");
        assert_eq!(kinds(arguments), vec!["(", "integer_literal", ")"]);
    }

    #[test]
    fn string_literals_are_single_leaves() {
        let node = parser(SupportedLanguage::Rust)
            .parse_fragment("\"a b\"", GrammarContext::Expression)
            .expect("expression");
        let object = node.as_object().expect("object");
        assert_eq!(object.get_str(TEXT_FIELD), Some("\"a b\""));
        assert!(!object.contains(CHILDREN_FIELD));
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "Vec<u8>", GrammarContext::Type)]
    #[case(SupportedLanguage::Rust, "items.len()", GrammarContext::Expression)]
    #[case(SupportedLanguage::Rust, "let x = 1;", GrammarContext::DeclarationList)]
    #[case(SupportedLanguage::TypeScript, "string[]", GrammarContext::Type)]
    #[case(SupportedLanguage::TypeScript, "a + b", GrammarContext::Expression)]
    #[case(SupportedLanguage::TypeScript, "let x = 1;", GrammarContext::DeclarationList)]
    fn snippets_resolve_to_first_accepting_context(
        #[case] language: SupportedLanguage,
        #[case] text: &str,
        #[case] expected: GrammarContext,
    ) {
        let snippet = parser(language).parse_snippet(text).expect("snippet");
        assert_eq!(snippet.context, expected);
        assert_eq!(snippet.node.as_array().is_none(), expected.is_singular());
    }

    #[test]
    fn statement_list_drops_body_braces() {
        let node = parser(SupportedLanguage::TypeScript)
            .parse_fragment("return x;", GrammarContext::StatementList)
            .expect("statements");
        assert_eq!(kinds(&node), vec!["return_statement"]);
    }

    #[rstest]
    #[case("f(x)", GrammarContext::Expression)]
    #[case("Some(Xa)", GrammarContext::Expression)]
    #[case("Fn(u8) -> u8", GrammarContext::Type)]
    fn call_syntax_is_not_a_rust_type(#[case] text: &str, #[case] expected: GrammarContext) {
        let snippet = parser(SupportedLanguage::Rust)
            .parse_snippet(text)
            .expect("snippet");
        assert_eq!(snippet.context, expected);
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "std::u32::MAX", GrammarContext::Expression)]
    #[case(SupportedLanguage::Rust, "len", GrammarContext::Expression)]
    #[case(SupportedLanguage::Rust, "io::Error", GrammarContext::Type)]
    #[case(SupportedLanguage::Rust, "T", GrammarContext::Type)]
    #[case(SupportedLanguage::TypeScript, "Xa.length", GrammarContext::Expression)]
    #[case(SupportedLanguage::TypeScript, "React.FC", GrammarContext::Type)]
    fn path_snippets_resolve_by_casing(
        #[case] language: SupportedLanguage,
        #[case] text: &str,
        #[case] expected: GrammarContext,
    ) {
        let snippet = parser(language).parse_snippet(text).expect("snippet");
        assert_eq!(snippet.context, expected);
    }

    #[test]
    fn partial_fragment_is_rejected() {
        let err = parser(SupportedLanguage::Rust)
            .parse_fragment("f(x);", GrammarContext::Expression)
            .expect_err("trailing semicolon is outside the expression");
        assert!(matches!(err, SyntaxError::ParseError { .. }));
    }

    #[test]
    fn unparseable_snippet_reports_parse_error() {
        let err = parser(SupportedLanguage::Rust)
            .parse_snippet("fn (")
            .expect_err("no context");
        assert!(matches!(err, SyntaxError::ParseError { .. }));
    }

    #[test]
    fn parse_source_rejects_syntax_errors() {
        let err = parser(SupportedLanguage::TypeScript)
            .parse_source("function broken( {")
            .expect_err("syntax error");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn parse_source_yields_root_object() {
        let node = parser(SupportedLanguage::Rust)
            .parse_source("fn main() {}\n")
            .expect("source");
        assert_eq!(node.kind(), Some("source_file"));
    }
}
