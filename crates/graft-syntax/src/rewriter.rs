//! Example-driven rewrite driver.
//!
//! [`Rewriter::prepare`] turns a pair of example snippets into a
//! [`RewriteRule`]: a pattern compiled from the `before` snippet and a
//! template compiled from the `after` snippet. [`Rewriter::apply`] parses a
//! source file, replaces every occurrence of the pattern with the
//! reconstructed template and renders the result canonically.
//!
//! Snippets that both reduce to a single expression become
//! [`RuleShape::Expression`] rules tried at every object node. Everything
//! else becomes a [`RuleShape::Window`] rule whose pattern is a multi-mode
//! window tried at every array node.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::environment::{Environment, WindowSlot};
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::node::{CHILDREN_FIELD, Node, Object, TEXT_FIELD};
use crate::parser::{FragmentParser, ParsedSnippet, Parser};
use crate::pattern::{DEFAULT_CAPTURE_MARKER, Pattern, PatternCompiler, WindowMode};
use crate::printer::{CanonicalPrinter, Printer};

/// Settings shared by every rule a [`Rewriter`] prepares and applies.
#[derive(Clone)]
pub struct RewriteOptions {
    capture_marker: String,
    sink: Arc<dyn DiagnosticSink>,
}

impl RewriteOptions {
    /// Creates options with the default `X` capture marker and no
    /// diagnostics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capture_marker: DEFAULT_CAPTURE_MARKER.to_owned(),
            sink: Arc::new(NoopSink),
        }
    }

    /// Sets the prefix marking identifiers as captures.
    #[must_use]
    pub fn with_capture_marker(mut self, marker: impl Into<String>) -> Self {
        self.capture_marker = marker.into();
        self
    }

    /// Sets the sink receiving intermediate trees.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the capture marker.
    #[must_use]
    pub fn capture_marker(&self) -> &str {
        &self.capture_marker
    }

    /// Returns the diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RewriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteOptions")
            .field("capture_marker", &self.capture_marker)
            .finish_non_exhaustive()
    }
}

/// How a rule is applied to a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleShape {
    /// Node-level rule checked at every object.
    Expression,
    /// Multi-mode window checked at every array.
    Window,
}

/// A structural rewrite rule compiled from a pair of example snippets.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    before: String,
    after: String,
    pattern: Pattern,
    template: Pattern,
    shape: RuleShape,
}

impl RewriteRule {
    /// Returns the pattern matched against input trees.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the template reconstructed for each match.
    #[must_use]
    pub const fn template(&self) -> &Pattern {
        &self.template
    }

    /// Returns how the rule is applied.
    #[must_use]
    pub const fn shape(&self) -> RuleShape {
        self.shape
    }

    /// Returns the `before` snippet the pattern was compiled from.
    #[must_use]
    pub fn before(&self) -> &str {
        &self.before
    }

    /// Returns the `after` snippet the template was compiled from.
    #[must_use]
    pub fn after(&self) -> &str {
        &self.after
    }

    /// Rewrites `node` children-first, counting replacements.
    ///
    /// Each candidate is checked with a fresh environment; replaced nodes
    /// are not revisited.
    fn rewrite(&self, node: Node, count: &mut usize) -> Result<Node, SyntaxError> {
        let rebuilt = match node {
            Node::Object(object) => Node::Object(
                object
                    .into_iter()
                    .map(|(name, value)| Ok((name, self.rewrite(value, count)?)))
                    .collect::<Result<Object, SyntaxError>>()?,
            ),
            Node::Array(items) => Node::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite(item, count))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            leaf @ (Node::Null | Node::Scalar(_)) => leaf,
        };

        let candidate = match self.shape {
            RuleShape::Expression => matches!(rebuilt, Node::Object(_)),
            RuleShape::Window => matches!(rebuilt, Node::Array(_)),
        };
        if !candidate {
            return Ok(rebuilt);
        }

        let mut env = Environment::new();
        if !self.pattern.check(&rebuilt, &mut env) {
            return Ok(rebuilt);
        }

        let replaced = env.slot().map_or(1, WindowSlot::match_count);
        *count = count.saturating_add(replaced);
        self.template.construct(&env)
    }
}

/// Result of a rewrite operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    output: String,
    num_replacements: usize,
}

impl RewriteResult {
    /// Returns the rendered output.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the result, returning the rendered output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    /// Returns the number of replacements made: matched windows for window
    /// rules, replaced nodes for expression rules.
    #[must_use]
    pub const fn num_replacements(&self) -> usize {
        self.num_replacements
    }

    /// Returns whether any replacements were made.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.num_replacements > 0
    }
}

/// Engine for preparing and applying rewrite rules.
#[derive(Debug, Clone)]
pub struct Rewriter {
    language: SupportedLanguage,
    options: RewriteOptions,
}

impl Rewriter {
    /// Creates a new rewriter for the given language with default options.
    #[must_use]
    pub fn new(language: SupportedLanguage) -> Self {
        Self::with_options(language, RewriteOptions::default())
    }

    /// Creates a new rewriter with explicit options.
    #[must_use]
    pub const fn with_options(language: SupportedLanguage, options: RewriteOptions) -> Self {
        Self { language, options }
    }

    /// Returns the language this rewriter is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the rewriter's options.
    #[must_use]
    pub const fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Compiles a rule from a pair of snippets using the Tree-sitter parser.
    ///
    /// # Errors
    ///
    /// See [`Rewriter::prepare_with`].
    pub fn prepare(&self, before: &str, after: &str) -> Result<RewriteRule, SyntaxError> {
        let mut parser = Parser::new(self.language)?;
        self.prepare_with(&mut parser, before, after)
    }

    /// Compiles a rule from a pair of snippets.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] if a snippet parses under no
    /// context, [`SyntaxError::PatternCompileError`] if the `before` snippet
    /// is empty or would match every node, and
    /// [`SyntaxError::UnboundVariable`] if the template uses a capture the
    /// pattern never binds.
    pub fn prepare_with<P>(
        &self,
        parser: &mut P,
        before: &str,
        after: &str,
    ) -> Result<RewriteRule, SyntaxError>
    where
        P: FragmentParser + ?Sized,
    {
        let before_snippet = strip(parser.parse_snippet(before)?);
        let after_snippet = strip(parser.parse_snippet(after)?);
        if before_snippet.node.as_array().is_some_and(<[Node]>::is_empty) {
            return Err(SyntaxError::pattern_compile(
                self.language,
                "the before snippet is empty",
            ));
        }

        let sink = self.options.sink();
        sink.dump("before", &before_snippet.node)?;
        sink.dump("after", &after_snippet.node)?;

        let compiler =
            PatternCompiler::new(self.language.capture_rule(&self.options.capture_marker));
        let expressions = (
            self.as_expression(&before_snippet),
            self.as_expression(&after_snippet),
        );
        let (shape, pattern, template) = match expressions {
            (Some(before_expr), Some(after_expr)) => (
                RuleShape::Expression,
                compiler.compile(&before_expr),
                compiler.compile(&after_expr),
            ),
            _ => (
                RuleShape::Window,
                compiler
                    .compile(&into_array(before_snippet.node))
                    .into_window(WindowMode::Multi)?,
                compiler
                    .compile(&into_array(after_snippet.node))
                    .into_window(WindowMode::Multi)?,
            ),
        };

        if matches!(pattern, Pattern::Capture(_)) {
            return Err(SyntaxError::pattern_compile(
                self.language,
                "the before snippet is a lone capture and would match every node",
            ));
        }
        let bound = pattern.capture_names();
        if let Some(name) = template
            .capture_names()
            .into_iter()
            .find(|name| !bound.contains(name))
        {
            return Err(SyntaxError::unbound_variable(name));
        }

        debug!(
            language = %self.language,
            before = %before_snippet.context,
            after = %after_snippet.context,
            ?shape,
            "rewrite rule prepared"
        );

        Ok(RewriteRule {
            before: before.to_owned(),
            after: after.to_owned(),
            pattern,
            template,
            shape,
        })
    }

    /// Reduces a snippet to a bare expression: singular contexts as they
    /// are, or a lone expression statement without its semicolon.
    fn as_expression(&self, snippet: &ParsedSnippet) -> Option<Node> {
        if snippet.context.is_singular() {
            return Some(snippet.node.clone());
        }

        let [statement] = snippet.node.as_array()? else {
            return None;
        };
        if statement.kind() != Some(self.language.expression_statement_kind()) {
            return None;
        }
        let children = statement.as_object()?.get(CHILDREN_FIELD)?.as_array()?;
        match children
            .iter()
            .filter(|child| !is_terminator(child))
            .collect::<Vec<_>>()
            .as_slice()
        {
            [expression] => Some((*expression).clone()),
            _ => None,
        }
    }

    /// Applies a rule to source code using the Tree-sitter parser and the
    /// canonical printer.
    ///
    /// # Errors
    ///
    /// See [`Rewriter::apply_with`].
    pub fn apply(&self, rule: &RewriteRule, source: &str) -> Result<RewriteResult, SyntaxError> {
        let mut parser = Parser::new(self.language)?;
        let printer = CanonicalPrinter::new(self.language);
        self.apply_with(&mut parser, &printer, rule, source)
    }

    /// Applies a rule to source code.
    ///
    /// The output is always rendered by `printer`, so a source without
    /// matches comes back reformatted but otherwise unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to parse, a template cannot be
    /// constructed, the printer fails, or the diagnostic sink fails.
    pub fn apply_with<P, R>(
        &self,
        parser: &mut P,
        printer: &R,
        rule: &RewriteRule,
        source: &str,
    ) -> Result<RewriteResult, SyntaxError>
    where
        P: FragmentParser + ?Sized,
        R: Printer + ?Sized,
    {
        let tree = parser.parse_source(source)?.strip_positions();
        let sink = self.options.sink();
        sink.dump("input", &tree)?;

        let mut num_replacements = 0;
        let rewritten = rule.rewrite(tree, &mut num_replacements)?;
        sink.dump("output", &rewritten)?;

        let output = printer.render(&rewritten)?;
        debug!(
            language = %self.language,
            replacements = num_replacements,
            "rewrite rule applied"
        );

        Ok(RewriteResult {
            output,
            num_replacements,
        })
    }

    /// Applies multiple rewrite rules in sequence.
    ///
    /// Each rule is applied to the result of the previous rule.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule application fails.
    pub fn apply_all(
        &self,
        rules: &[RewriteRule],
        source: &str,
    ) -> Result<RewriteResult, SyntaxError> {
        let mut current = source.to_owned();
        let mut total_replacements: usize = 0;

        for rule in rules {
            let result = self.apply(rule, &current)?;
            total_replacements = total_replacements.saturating_add(result.num_replacements);
            current = result.output;
        }

        Ok(RewriteResult {
            output: current,
            num_replacements: total_replacements,
        })
    }
}

fn strip(snippet: ParsedSnippet) -> ParsedSnippet {
    ParsedSnippet {
        context: snippet.context,
        node: snippet.node.strip_positions(),
    }
}

fn into_array(node: Node) -> Node {
    match node {
        Node::Array(_) => node,
        other => Node::Array(vec![other]),
    }
}

fn is_terminator(node: &Node) -> bool {
    node.as_object()
        .and_then(|object| object.get_str(TEXT_FIELD))
        == Some(";")
}
