// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-pass parser for lexed node sequences.
//!
//! The parser walks the nodes once, front to back, building the
//! document AST as it goes. Dispatch is an exhaustive `match` on
//! [`NodeType`]: adding a node type without deciding how to parse it is
//! a compile error, not a runtime surprise.
//!
//! # Design Philosophy
//!
//! - **Recovery is mandatory** - a misplaced node reports a diagnostic
//!   and is dropped; the rest of the document still parses
//! - **Context over lookahead** - grammar rules read the open region
//!   tracked by the parsing context rather than re-scanning the stream
//! - **Neighbour collection** - `Tag` and `Text` nodes have no
//!   subparser; declarations collect tags backward through a cloned
//!   cursor, and a feature collects its description text forward
//!
//! # Usage
//!
//! ```
//! use fabula_core::ast::{Document, FileInfo};
//! use fabula_core::language::BundledDictionaries;
//! use fabula_core::lexing::Lexer;
//! use fabula_core::parsing::Parser;
//!
//! let mut lexer = Lexer::new(Box::new(BundledDictionaries), "en").unwrap();
//! lexer.add_line("Feature: Login", 1);
//! lexer.add_line("Scenario: Successful login", 2);
//!
//! let mut document = Document::new(FileInfo::new("login.fabula"));
//! let mut parser = Parser::new();
//! parser.analyse(lexer.nodes(), &mut document);
//!
//! assert!(!parser.has_errors());
//! let feature = document.feature.unwrap();
//! assert_eq!(feature.name, "Login");
//! assert_eq!(feature.scenarios.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::{Document, Tag};
use crate::diagnostics::Diagnostic;
use crate::lexing::{Location, Node, NodePayload, NodeType};

// Submodules with additional impl blocks for Parser
mod blocks;
mod context;
mod cursor;
mod declarations;
mod list_items;
mod steps;

pub use cursor::NodeCursor;

use context::ParsingContext;

/// A parser for lexed Fabula documents.
///
/// One parser can analyse many node sequences; diagnostics are cleared
/// at the start of each [`analyse`](Self::analyse) call.
#[derive(Debug)]
pub struct Parser {
    diagnostics: Vec<Diagnostic>,
    stop_on_first_error: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            stop_on_first_error: false,
        }
    }

    /// Makes the next `analyse` call abandon the walk at the first
    /// error instead of recovering.
    pub fn stop_on_first_error(&mut self, stop: bool) {
        self.stop_on_first_error = stop;
    }

    /// Parses `nodes` into `document`.
    ///
    /// Returns the node types that had no subparser and were skipped,
    /// deduplicated. Tags are collected backward by declarations but
    /// still pass through the walk, so `Tag` is reported whenever the
    /// document has any; text consumed as a feature description is not,
    /// because the feature subparser advances the cursor past it.
    pub fn analyse(&mut self, nodes: &[Node], document: &mut Document) -> Vec<NodeType> {
        self.diagnostics.clear();
        let mut ignored: Vec<NodeType> = Vec::new();
        let mut context = ParsingContext::new(document);
        let mut cursor = NodeCursor::new(nodes);

        while let Some(node) = cursor.next() {
            let node_type = node.node_type();
            match node_type {
                NodeType::Tag | NodeType::Text => {
                    if !ignored.contains(&node_type) {
                        ignored.push(node_type);
                    }
                }
                _ => {
                    if let Some(parsed) = self.parse_node(node, &mut cursor, &mut context) {
                        context.last_parsed = Some(parsed);
                    }
                }
            }
            if self.stop_on_first_error && self.has_errors() {
                break;
            }
        }
        ignored
    }

    /// Dispatches one node to its subparser.
    ///
    /// Returns the classified type of the node when it parsed; `None`
    /// means the node was rejected (and a diagnostic reported).
    fn parse_node(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        match node.node_type() {
            NodeType::Language => self.parse_language(node, context),
            NodeType::Import => self.parse_import(node, context),
            NodeType::Feature => self.parse_feature(node, cursor, context),
            NodeType::Background => self.parse_background(node, context),
            NodeType::VariantBackground => self.parse_variant_background(node, context),
            NodeType::Scenario => self.parse_scenario(node, cursor, context),
            NodeType::Variant => self.parse_variant(node, cursor, context),
            NodeType::TestCase => self.parse_test_case(node, cursor, context),
            NodeType::StepGiven
            | NodeType::StepWhen
            | NodeType::StepThen
            | NodeType::StepAnd
            | NodeType::StepOtherwise => self.parse_step(node, context),
            NodeType::ConstantBlock => self.parse_constant_block(node, context),
            NodeType::RegexBlock => self.parse_regex_block(node, context),
            NodeType::Table => self.parse_table(node, context),
            NodeType::TableRow => self.parse_table_row(node, context),
            NodeType::UiElement => self.parse_ui_element(node, cursor, context),
            NodeType::Database => self.parse_database(node, context),
            NodeType::BeforeAll
            | NodeType::AfterAll
            | NodeType::BeforeFeature
            | NodeType::AfterFeature
            | NodeType::BeforeEachScenario
            | NodeType::AfterEachScenario => self.parse_test_event(node, context),
            NodeType::ListItem => self.parse_list_item(node, cursor, context),
            // Classified forms of ListItem; the lexer never emits them
            // as raw nodes, so there is nothing to do here.
            NodeType::Constant
            | NodeType::Regex
            | NodeType::UiProperty
            | NodeType::DatabaseProperty => None,
            // Collected by neighbours; analyse() records them as ignored.
            NodeType::Tag | NodeType::Text => None,
        }
    }

    /// Reports a syntactic error.
    pub(super) fn error(&mut self, message: impl Into<EcoString>, location: Location) {
        self.diagnostics
            .push(Diagnostic::syntactic_error(message, location));
    }

    /// All diagnostics from the last `analyse` call.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The error diagnostics from the last `analyse` call.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// True when the last `analyse` call reported at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the tag nodes immediately before the cursor's position.
///
/// Walks backward through a clone, so the main cursor never moves; the
/// returned tags are in source order. Collection is idempotent: the
/// walk stops at the first non-tag node, so a declaration only ever
/// sees its own contiguous tag block.
pub(super) fn collect_tags(cursor: &NodeCursor<'_>) -> Vec<Tag> {
    let mut back = cursor.clone();
    let mut tags = Vec::new();
    while let Some(prior) = back.prior() {
        let NodePayload::Tag { name, content } = &prior.payload else {
            break;
        };
        tags.push(Tag {
            name: name.clone(),
            content: content.clone(),
            location: prior.location,
        });
    }
    tags.reverse();
    tags
}
