// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subparsers for preamble facts and named declarations.
//!
//! Block openers whose bodies are lists (backgrounds, constant and
//! regex blocks, test events, table rows) live in [`super::blocks`].

use crate::ast::{Database, Feature, ImportDecl, LanguageDecl, Scenario, Table, TestCase, UiElement, Variant};
use crate::lexing::{Node, NodePayload, NodeType};

use super::context::{ActiveScope, ParsingContext, UiOwner};
use super::{collect_tags, NodeCursor, Parser};

impl Parser {
    /// `#language: <tag>`. Valid once, and only before any import or
    /// the feature.
    pub(super) fn parse_language(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Language { value } = &node.payload else {
            return None;
        };
        if context.doc.language.is_some() {
            self.error("language is declared more than once", node.location);
            return None;
        }
        if !context.doc.imports.is_empty() {
            self.error(
                "the language must be declared before any import",
                node.location,
            );
            return None;
        }
        if context.doc.feature.is_some() {
            self.error(
                "the language must be declared before the feature",
                node.location,
            );
            return None;
        }
        context.doc.language = Some(LanguageDecl {
            value: value.clone(),
            location: node.location,
        });
        Some(NodeType::Language)
    }

    /// `import "path"`. Imports precede the feature, and the same path
    /// may not be imported twice.
    pub(super) fn parse_import(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Import { value } = &node.payload else {
            return None;
        };
        if context.doc.feature.is_some() {
            self.error(
                "an import must be declared before the feature",
                node.location,
            );
            return None;
        }
        if context.doc.imports.iter().any(|import| import.value == *value) {
            self.error(
                format!("file is imported more than once: \"{value}\""),
                node.location,
            );
            return None;
        }
        context.doc.imports.push(ImportDecl {
            value: value.clone(),
            location: node.location,
        });
        Some(NodeType::Import)
    }

    /// `Feature: <name>`. One per document; the first wins. Collects
    /// preceding tags and consumes following text lines as description.
    pub(super) fn parse_feature(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Feature { name } = &node.payload else {
            return None;
        };
        if context.doc.feature.is_some() {
            self.error(
                "feature is declared more than once; keeping the first",
                node.location,
            );
            return None;
        }
        let mut feature = Feature::new(name.clone(), node.location, collect_tags(cursor));
        while let Some(next) = cursor.spy_next() {
            let NodePayload::Text { content } = &next.payload else {
                break;
            };
            feature.description.push(content.clone());
            cursor.next();
        }
        context.doc.feature = Some(feature);
        context.scope = ActiveScope::Feature;
        Some(NodeType::Feature)
    }

    /// `Scenario: <name>`. Requires a feature.
    pub(super) fn parse_scenario(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Scenario { name } = &node.payload else {
            return None;
        };
        let tags = collect_tags(cursor);
        let Some(feature) = context.feature_mut() else {
            self.error("a scenario must be declared after a feature", node.location);
            return None;
        };
        feature
            .scenarios
            .push(Scenario::new(name.clone(), node.location, tags));
        context.scope = ActiveScope::Scenario;
        Some(NodeType::Scenario)
    }

    /// `Variant: <name>`. Attaches to the last scenario; in a document
    /// without a feature it is kept as an orphan for cross-document
    /// resolution.
    pub(super) fn parse_variant(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Variant { name } = &node.payload else {
            return None;
        };
        let variant = Variant::new(name.clone(), node.location, collect_tags(cursor));
        if context.doc.feature.is_some() {
            let Some(scenario) = context.last_scenario_mut() else {
                self.error("a variant must be declared after a scenario", node.location);
                return None;
            };
            scenario.variants.push(variant);
        } else {
            context.doc.variants.push(variant);
        }
        context.scope = ActiveScope::Variant;
        Some(NodeType::Variant)
    }

    /// `Test Case: <name>`. Belongs to the document's feature, or to an
    /// imported one.
    pub(super) fn parse_test_case(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::TestCase { name } = &node.payload else {
            return None;
        };
        if context.doc.feature.is_none() && context.doc.imports.is_empty() {
            self.error(
                "a test case must be declared after a feature or an import",
                node.location,
            );
            return None;
        }
        context.doc.test_cases.push(TestCase {
            name: name.clone(),
            location: node.location,
            tags: collect_tags(cursor),
            sentences: Vec::new(),
        });
        context.scope = ActiveScope::TestCase;
        Some(NodeType::TestCase)
    }

    /// `UI Element: <name>`. Local to the feature; `@global` elements
    /// attach to the document instead and need no feature.
    pub(super) fn parse_ui_element(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::UiElement { name } = &node.payload else {
            return None;
        };
        let element = UiElement {
            name: name.clone(),
            location: node.location,
            tags: collect_tags(cursor),
            items: Vec::new(),
        };
        if element.is_global() {
            context.doc.ui_elements.push(element);
            context.set_current_element(UiOwner::Document(context.doc.ui_elements.len() - 1));
        } else {
            let Some(feature) = context.feature_mut() else {
                self.error(
                    "a ui element must be declared after a feature unless it is tagged @global",
                    node.location,
                );
                return None;
            };
            feature.ui_elements.push(element);
            let index = feature.ui_elements.len() - 1;
            context.set_current_element(UiOwner::Feature(index));
        }
        context.scope = ActiveScope::UiElement;
        Some(NodeType::UiElement)
    }

    /// `Database: <name>`. Duplicate names are a semantic concern, not
    /// a parse error.
    pub(super) fn parse_database(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Database { name } = &node.payload else {
            return None;
        };
        context.doc.databases.push(Database {
            name: name.clone(),
            location: node.location,
            properties: Vec::new(),
        });
        context.current_database = Some(context.doc.databases.len() - 1);
        context.scope = ActiveScope::Database;
        Some(NodeType::Database)
    }

    /// `Table: <name>`. Rows follow as `TableRow` nodes.
    pub(super) fn parse_table(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Table { name } = &node.payload else {
            return None;
        };
        context.doc.tables.push(Table {
            name: name.clone(),
            location: node.location,
            rows: Vec::new(),
        });
        context.current_table = Some(context.doc.tables.len() - 1);
        context.scope = ActiveScope::Table;
        Some(NodeType::Table)
    }
}
