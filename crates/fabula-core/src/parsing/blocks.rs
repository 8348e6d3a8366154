// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subparsers for block openers and table rows.

use crate::ast::{Background, ConstantBlock, RegexBlock, TableRow, TestEventBlock, VariantBackground};
use crate::lexing::{Node, NodePayload, NodeType, TestEventKind};

use super::context::{ActiveScope, ParsingContext};
use super::Parser;

fn event_label(kind: TestEventKind) -> &'static str {
    match kind {
        TestEventKind::BeforeAll => "Before All",
        TestEventKind::AfterAll => "After All",
        TestEventKind::BeforeFeature => "Before Feature",
        TestEventKind::AfterFeature => "After Feature",
        TestEventKind::BeforeEachScenario => "Before Each Scenario",
        TestEventKind::AfterEachScenario => "After Each Scenario",
    }
}

impl Parser {
    /// `Background:`. One per feature, before the first scenario.
    pub(super) fn parse_background(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let Some(feature) = context.feature_mut() else {
            self.error("a background must belong to a feature", node.location);
            return None;
        };
        if feature.background.is_some() {
            self.error("background is declared more than once", node.location);
            return None;
        }
        if !feature.scenarios.is_empty() {
            self.error(
                "the background must be declared before the first scenario",
                node.location,
            );
            return None;
        }
        feature.background = Some(Background {
            location: node.location,
            sentences: Vec::new(),
        });
        context.scope = ActiveScope::Background;
        Some(NodeType::Background)
    }

    /// `Variant Background:`. Before any scenario it applies to the
    /// whole feature; afterwards, to the last scenario only.
    pub(super) fn parse_variant_background(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let Some(feature) = context.feature_mut() else {
            self.error("a variant background must belong to a feature", node.location);
            return None;
        };
        let block = VariantBackground {
            location: node.location,
            sentences: Vec::new(),
        };
        if let Some(scenario) = feature.scenarios.last_mut() {
            if scenario.variant_background.is_some() {
                self.error(
                    "variant background is declared more than once for this scenario",
                    node.location,
                );
                return None;
            }
            scenario.variant_background = Some(block);
            context.scope = ActiveScope::ScenarioVariantBackground;
        } else {
            if feature.variant_background.is_some() {
                self.error("variant background is declared more than once", node.location);
                return None;
            }
            feature.variant_background = Some(block);
            context.scope = ActiveScope::VariantBackground;
        }
        Some(NodeType::VariantBackground)
    }

    /// `Constants:`. One per document.
    pub(super) fn parse_constant_block(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        if context.doc.constant_block.is_some() {
            self.error("constants block is declared more than once", node.location);
            // Reopen the first block so following items still land there.
            context.scope = ActiveScope::ConstantBlock;
            return None;
        }
        context.doc.constant_block = Some(ConstantBlock {
            location: node.location,
            constants: Vec::new(),
        });
        context.scope = ActiveScope::ConstantBlock;
        Some(NodeType::ConstantBlock)
    }

    /// `Regular Expressions:`. One per document.
    pub(super) fn parse_regex_block(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        if context.doc.regex_block.is_some() {
            self.error(
                "regular expressions block is declared more than once",
                node.location,
            );
            context.scope = ActiveScope::RegexBlock;
            return None;
        }
        context.doc.regex_block = Some(RegexBlock {
            location: node.location,
            entries: Vec::new(),
        });
        context.scope = ActiveScope::RegexBlock;
        Some(NodeType::RegexBlock)
    }

    /// One of the six test hook blocks. The feature-scoped four require
    /// a feature; every slot may be filled once.
    pub(super) fn parse_test_event(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::TestEvent { event } = &node.payload else {
            return None;
        };
        let event = *event;
        let needs_feature = matches!(
            event,
            TestEventKind::BeforeFeature
                | TestEventKind::AfterFeature
                | TestEventKind::BeforeEachScenario
                | TestEventKind::AfterEachScenario
        );
        if needs_feature && context.doc.feature.is_none() {
            self.error(
                format!("`{}` requires a feature in this document", event_label(event)),
                node.location,
            );
            return None;
        }
        let slot = context.doc.events.slot_mut(event);
        if slot.is_some() {
            self.error(
                format!("`{}` is declared more than once", event_label(event)),
                node.location,
            );
            return None;
        }
        *slot = Some(TestEventBlock {
            location: node.location,
            sentences: Vec::new(),
        });
        context.scope = ActiveScope::TestEvent(event);
        Some(node.node_type())
    }

    /// `| a | b |`. Only valid while a table is the open region.
    pub(super) fn parse_table_row(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::TableRow { cells } = &node.payload else {
            return None;
        };
        if context.scope != ActiveScope::Table {
            self.error("table row outside a table", node.location);
            return None;
        }
        let Some(table) = context.current_table_mut() else {
            return None;
        };
        table.rows.push(TableRow {
            cells: cells.clone(),
            location: node.location,
        });
        Some(NodeType::TableRow)
    }
}
