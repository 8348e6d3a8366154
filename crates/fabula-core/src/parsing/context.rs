// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing context: the one open region and its back-references.
//!
//! Fabula's grammar is context-sensitive in a shallow way: what a node
//! means depends on which region of the document is open (a list item
//! is a constant inside `Constants:` but a property inside a UI
//! element). [`ActiveScope`] makes "at most one open region" structural
//! instead of a bag of booleans, and the context's current-indices let
//! later nodes reach the region they belong to even after unrelated
//! nodes went by.

use crate::ast::{Database, Document, Feature, Scenario, Step, Table, UiElement, UiProperty};
use crate::lexing::{NodeType, TestEventKind};

/// The region of the document the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ActiveScope {
    /// Before any region-opening declaration.
    None,
    Feature,
    Background,
    /// A feature-level `Variant Background:`.
    VariantBackground,
    Scenario,
    /// A `Variant Background:` attached to the last scenario.
    ScenarioVariantBackground,
    Variant,
    TestCase,
    ConstantBlock,
    RegexBlock,
    Table,
    UiElement,
    /// Inside a UI element, after at least one property line.
    UiProperty,
    Database,
    /// One of the six test hook blocks.
    TestEvent(TestEventKind),
}

impl ActiveScope {
    /// True for regions whose body is a list of step sentences.
    pub(super) fn accepts_steps(self) -> bool {
        matches!(
            self,
            Self::Background
                | Self::VariantBackground
                | Self::ScenarioVariantBackground
                | Self::Scenario
                | Self::Variant
                | Self::TestCase
                | Self::TestEvent(_)
        )
    }

    /// True for the two variant-background regions, where `Then`
    /// sentences are not allowed.
    pub(super) fn is_variant_background(self) -> bool {
        matches!(self, Self::VariantBackground | Self::ScenarioVariantBackground)
    }
}

/// Where the current UI element lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UiOwner {
    /// Index into [`Document::ui_elements`].
    Document(usize),
    /// Index into the feature's `ui_elements`.
    Feature(usize),
}

/// Mutable parse state for one document pass.
///
/// The scope changes on every region-opening node; the current-indices
/// are back-references that survive scope changes, so a `| row |` still
/// finds its table after intervening diagnostics reset nothing.
#[derive(Debug)]
pub(super) struct ParsingContext<'d> {
    pub(super) doc: &'d mut Document,
    pub(super) scope: ActiveScope,
    /// Classified type of the last successfully parsed node. Tags and
    /// text are invisible here; step ordering rules read this.
    pub(super) last_parsed: Option<NodeType>,
    pub(super) current_table: Option<usize>,
    pub(super) current_database: Option<usize>,
    pub(super) current_ui_element: Option<UiOwner>,
    /// Index into the current element's `items`.
    pub(super) current_ui_property: Option<usize>,
}

impl<'d> ParsingContext<'d> {
    pub(super) fn new(doc: &'d mut Document) -> Self {
        Self {
            doc,
            scope: ActiveScope::None,
            last_parsed: None,
            current_table: None,
            current_database: None,
            current_ui_element: None,
            current_ui_property: None,
        }
    }

    pub(super) fn feature_mut(&mut self) -> Option<&mut Feature> {
        self.doc.feature.as_mut()
    }

    pub(super) fn last_scenario_mut(&mut self) -> Option<&mut Scenario> {
        self.doc.feature.as_mut()?.scenarios.last_mut()
    }

    pub(super) fn current_table_mut(&mut self) -> Option<&mut Table> {
        self.doc.tables.get_mut(self.current_table?)
    }

    pub(super) fn current_database_mut(&mut self) -> Option<&mut Database> {
        self.doc.databases.get_mut(self.current_database?)
    }

    pub(super) fn current_element_mut(&mut self) -> Option<&mut UiElement> {
        match self.current_ui_element? {
            UiOwner::Document(index) => self.doc.ui_elements.get_mut(index),
            UiOwner::Feature(index) => self.doc.feature.as_mut()?.ui_elements.get_mut(index),
        }
    }

    pub(super) fn current_property_mut(&mut self) -> Option<&mut UiProperty> {
        let index = self.current_ui_property?;
        self.current_element_mut()?.items.get_mut(index)
    }

    /// Makes `owner` the current element and forgets any current property.
    pub(super) fn set_current_element(&mut self, owner: UiOwner) {
        self.current_ui_element = Some(owner);
        self.current_ui_property = None;
    }

    /// The sentence list of the open region, for scopes that have one.
    ///
    /// `UiProperty` is deliberately absent: `Otherwise`/`And` routing
    /// into a property's otherwise-sentences is its own rule.
    pub(super) fn step_sentences_mut(&mut self) -> Option<&mut Vec<Step>> {
        match self.scope {
            ActiveScope::Background => self
                .doc
                .feature
                .as_mut()?
                .background
                .as_mut()
                .map(|b| &mut b.sentences),
            ActiveScope::VariantBackground => self
                .doc
                .feature
                .as_mut()?
                .variant_background
                .as_mut()
                .map(|b| &mut b.sentences),
            ActiveScope::ScenarioVariantBackground => self
                .last_scenario_mut()?
                .variant_background
                .as_mut()
                .map(|b| &mut b.sentences),
            ActiveScope::Scenario => self.last_scenario_mut().map(|s| &mut s.sentences),
            ActiveScope::Variant => {
                if self.doc.feature.is_some() {
                    self.last_scenario_mut()?
                        .variants
                        .last_mut()
                        .map(|v| &mut v.sentences)
                } else {
                    self.doc.variants.last_mut().map(|v| &mut v.sentences)
                }
            }
            ActiveScope::TestCase => self.doc.test_cases.last_mut().map(|t| &mut t.sentences),
            ActiveScope::TestEvent(kind) => self
                .doc
                .events
                .slot_mut(kind)
                .as_mut()
                .map(|b| &mut b.sentences),
            _ => None,
        }
    }
}
