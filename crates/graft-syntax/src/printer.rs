//! Rendering [`Node`] trees back to source text.
//!
//! [`CanonicalPrinter`] emits the leaves of a bridged tree in order,
//! separated by single spaces except around punctuation, and lays out
//! brace-delimited blocks one child per line. Input whitespace is never
//! consulted, so the output only depends on the tree's structure. JSX is the
//! exception: its text leaves carry their own whitespace, and nothing is
//! inserted between JSX children.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::node::{CHILDREN_FIELD, KIND_FIELD, NAME_FIELD, Node, Object, TEXT_FIELD};

const INDENT: &str = "    ";

/// Tokens never preceded by a space.
const TIGHT_BEFORE: &[&str] = &[",", ";", ".", ")", "]", "::", "?."];

/// Tokens never followed by a space.
const TIGHT_AFTER: &[&str] = &["(", "[", ".", "::", "#", "'", "?.", "..."];

/// Parents whose leading punctuation binds to the following operand.
const PREFIX_PARENTS: &[&str] = &[
    "unary_expression",
    "update_expression",
    "removed_trait_bound",
    "base_field_initializer",
    "reference_expression",
    "reference_type",
    "pointer_type",
    "self_parameter",
    "negative_literal",
    "spread_element",
    "rest_pattern",
];

/// Parents whose angle brackets hug their contents.
const GENERIC_PARENTS: &[&str] = &["type_arguments", "type_parameters"];

/// Parents that keep a spaced `:` and `?`.
const CONDITIONAL_PARENTS: &[&str] = &["ternary_expression", "conditional_type"];

/// JSX tags; their angle brackets hug the tag contents.
const JSX_TAGS: &[&str] = &[
    "jsx_opening_element",
    "jsx_closing_element",
    "jsx_self_closing_element",
];

/// Prefix operators that lex as another operator when doubled: `- -x` is not
/// `--x`.
const FUSING: &[char] = &['+', '-'];

/// Renders trees to source text.
pub trait Printer {
    /// Renders `node` as source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree contains a node the printer cannot
    /// render.
    fn render(&self, node: &Node) -> Result<String, SyntaxError>;
}

/// Deterministic printer for bridged trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalPrinter {
    language: SupportedLanguage,
}

impl CanonicalPrinter {
    /// Creates a printer using the layout tables of `language`.
    #[must_use]
    pub const fn new(language: SupportedLanguage) -> Self {
        Self { language }
    }

    /// Returns the language this printer lays out.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }
}

impl Printer for CanonicalPrinter {
    fn render(&self, node: &Node) -> Result<String, SyntaxError> {
        let mut layout = Layout::new(self.language);
        match node {
            Node::Array(items) => layout.lines(items, None)?,
            _ => layout.node(node, None)?,
        }
        Ok(layout.out)
    }
}

#[derive(Debug, Clone, Copy)]
struct Token<'n> {
    text: &'n str,
    kind: &'n str,
    parent: Option<&'n str>,
    /// Whether the token is its parent's first child.
    leading: bool,
}

fn among(text: &str, set: &[&str]) -> bool {
    set.iter().any(|candidate| *candidate == text)
}

impl Token<'_> {
    fn parent_in(&self, parents: &[&str]) -> bool {
        self.parent.is_some_and(|parent| among(parent, parents))
    }

    fn is_word(&self) -> bool {
        self.text
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }

    /// Anonymous tokens, and keyword-like named leaves, carry their text as
    /// their kind.
    fn is_keyword(&self) -> bool {
        self.kind == self.text && self.text.chars().all(|c| c.is_alphabetic() || c == '_')
    }

    fn is_punctuation(&self) -> bool {
        !self.text.chars().any(char::is_alphanumeric)
    }

    fn is_comment(&self) -> bool {
        self.kind.ends_with("comment")
    }

    /// Whether the token sits on the edge of a JSX child: the text between
    /// tags, or the bracket that opens or closes a tag or an embedded
    /// expression.
    fn is_jsx_edge(&self, opening: bool) -> bool {
        if self.parent_in(&["jsx_element"]) {
            return true;
        }
        let (tags, brace): (&[&str], _) = if opening {
            (&["<", "</"], "{")
        } else {
            (&[">", "/>"], "}")
        };
        (among(self.text, tags) && self.parent_in(JSX_TAGS))
            || (self.text == brace && self.parent_in(&["jsx_expression"]))
    }
}

/// Whether writing `prev` and `next` together would lex as another token.
fn fuses(prev: &Token<'_>, next: &Token<'_>) -> bool {
    let (Some(last), Some(first)) = (prev.text.chars().next_back(), next.text.chars().next())
    else {
        return false;
    };
    prev.is_punctuation() && next.is_punctuation() && last == first && FUSING.contains(&last)
}

/// Spacing inside JSX, where whitespace between children is content.
fn jsx_spacing(prev: &Token<'_>, next: &Token<'_>) -> Option<bool> {
    if prev.is_jsx_edge(false) && next.is_jsx_edge(true) {
        return Some(false);
    }
    if among(prev.text, &["<", "</", "/"]) && prev.parent_in(JSX_TAGS) {
        return Some(false);
    }
    if matches!(next.text, ">" | "/") && next.parent_in(JSX_TAGS) {
        return Some(next.text == "/" && next.parent_in(&["jsx_self_closing_element"]));
    }
    if (prev.text == "=" && prev.parent_in(&["jsx_attribute"]))
        || (next.text == "=" && next.parent_in(&["jsx_attribute"]))
        || (prev.text == ":" && prev.parent_in(&["jsx_namespace_name"]))
    {
        return Some(false);
    }
    if (prev.text == "{" && prev.parent_in(&["jsx_expression"]))
        || (next.text == "}" && next.parent_in(&["jsx_expression"]))
    {
        return Some(false);
    }
    None
}

fn spaced(prev: &Token<'_>, next: &Token<'_>) -> bool {
    if let Some(spacing) = jsx_spacing(prev, next) {
        return spacing;
    }
    if fuses(prev, next) {
        return true;
    }
    if among(next.text, TIGHT_BEFORE) || among(prev.text, TIGHT_AFTER) {
        return false;
    }
    if (among(prev.text, &["..", "..="]) && prev.parent_in(&["range_expression"]))
        || (among(next.text, &["..", "..="]) && next.parent_in(&["range_expression"]))
    {
        return false;
    }
    if among(next.text, &["++", "--"]) && next.parent_in(&["update_expression"]) && !next.leading
    {
        return false;
    }
    if next.text == "?" && next.parent_in(&["removed_trait_bound"]) {
        return true;
    }
    if prev.text == "{" && next.text == "}" {
        return false;
    }
    if matches!(next.text, ":" | "?") {
        return next.parent_in(CONDITIONAL_PARENTS);
    }
    if prev.is_punctuation() && prev.leading && prev.parent_in(PREFIX_PARENTS) {
        return false;
    }
    if matches!(next.text, "<" | ">") && next.parent_in(GENERIC_PARENTS) {
        return false;
    }
    if prev.text == "<" && prev.parent_in(GENERIC_PARENTS) {
        return false;
    }
    if next.text == "!" && next.parent_in(&["macro_invocation", "non_null_expression"]) {
        return false;
    }
    if prev.parent_in(&["closure_parameters"])
        && next.parent_in(&["closure_parameters"])
        && (prev.text == "|") != (next.text == "|")
    {
        return false;
    }
    if matches!(next.text, "(" | "[") {
        return !opens_call(prev);
    }
    true
}

/// Whether an opening bracket after `prev` starts a call, index or macro
/// body.
fn opens_call(prev: &Token<'_>) -> bool {
    match prev.text {
        ")" | "]" => true,
        ">" => prev.parent_in(GENERIC_PARENTS),
        "!" => prev.parent_in(&["macro_invocation", "inner_attribute_item"]),
        _ => prev.is_word() && !prev.is_keyword(),
    }
}

struct Layout<'n> {
    language: SupportedLanguage,
    out: String,
    depth: usize,
    leading: bool,
    line_start: bool,
    pending_break: bool,
    prev: Option<Token<'n>>,
}

impl<'n> Layout<'n> {
    const fn new(language: SupportedLanguage) -> Self {
        Self {
            language,
            out: String::new(),
            depth: 0,
            leading: false,
            line_start: true,
            pending_break: false,
            prev: None,
        }
    }

    fn node(&mut self, node: &'n Node, parent: Option<&'n str>) -> Result<(), SyntaxError> {
        let Node::Object(object) = node else {
            return Err(SyntaxError::unsupported_node_kind(format!(
                "{} where a syntax node was expected",
                node.variant_name()
            )));
        };
        let kind = object
            .get_str(KIND_FIELD)
            .ok_or_else(|| SyntaxError::unsupported_node_kind("object without a Kind"))?;

        if let Some(text) = leaf_text(object) {
            let leading = self.leading;
            self.token(Token {
                text,
                kind,
                parent,
                leading,
            });
            return Ok(());
        }

        let children = object
            .get(CHILDREN_FIELD)
            .and_then(Node::as_array)
            .ok_or_else(|| {
                SyntaxError::unsupported_node_kind(format!("{kind} without Name, Text or Children"))
            })?;

        if kind == self.language.root_kind() {
            self.lines(children, Some(kind))
        } else if self.language.is_block_kind(kind) {
            self.block(children, kind)
        } else {
            children.iter().enumerate().try_for_each(|(index, child)| {
                self.leading = index == 0;
                self.node(child, Some(kind))
            })
        }
    }

    /// Puts every child on its own line, ending with a newline.
    fn lines(&mut self, children: &'n [Node], kind: Option<&'n str>) -> Result<(), SyntaxError> {
        for child in children {
            if !is_separator(child) {
                self.break_line();
            }
            self.leading = false;
            self.node(child, kind)?;
        }
        self.break_line();
        Ok(())
    }

    fn block(&mut self, children: &'n [Node], kind: &'n str) -> Result<(), SyntaxError> {
        let (open, inner, close) = split_braces(children);
        self.leading = false;
        if let Some(open) = open {
            self.node(open, Some(kind))?;
        }

        if !inner.is_empty() {
            self.depth = self.depth.saturating_add(1);
            for child in inner {
                if !is_separator(child) {
                    self.break_line();
                }
                self.leading = false;
                self.node(child, Some(kind))?;
            }
            self.depth = self.depth.saturating_sub(1);
            self.break_line();
        }

        if let Some(close) = close {
            self.leading = false;
            self.node(close, Some(kind))?;
        }
        Ok(())
    }

    fn token(&mut self, token: Token<'n>) {
        if self.pending_break {
            self.break_line();
        }
        if self.line_start {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.line_start = false;
        } else if self.prev.as_ref().is_some_and(|prev| spaced(prev, &token)) {
            self.out.push(' ');
        }

        self.out.push_str(token.text);
        self.pending_break = token.is_comment() && token.text.starts_with("//");
        self.prev = Some(token);
    }

    fn break_line(&mut self) {
        if !self.line_start {
            self.out.push('\n');
            self.line_start = true;
        }
        self.pending_break = false;
    }
}

fn leaf_text(object: &Object) -> Option<&str> {
    object
        .get_str(NAME_FIELD)
        .or_else(|| object.get_str(TEXT_FIELD))
}

fn is_separator(node: &Node) -> bool {
    node.as_object()
        .and_then(|object| object.get_str(TEXT_FIELD))
        .is_some_and(|text| matches!(text, "," | ";"))
}

/// Splits a block's children into its opening brace, contents and closing
/// brace.
fn split_braces(children: &[Node]) -> (Option<&Node>, &[Node], Option<&Node>) {
    let is_leaf = |node: &Node, test: fn(&str) -> bool| {
        node.as_object()
            .and_then(|object| object.get_str(TEXT_FIELD))
            .is_some_and(test)
    };

    let (open, inner) = match children.split_first() {
        Some((first, rest)) if is_leaf(first, |text| text.starts_with('{')) => (Some(first), rest),
        _ => (None, children),
    };
    let (close, inner) = match inner.split_last() {
        Some((last, rest)) if is_leaf(last, |text| text.ends_with('}')) => (Some(last), rest),
        _ => (None, inner),
    };
    (open, inner, close)
}
