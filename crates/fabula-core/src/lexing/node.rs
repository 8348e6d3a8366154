// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lexical nodes produced by line analysis.
//!
//! Each source line lexes into zero or more [`Node`]s. A node pairs a
//! [`Location`] with a [`NodePayload`] carrying the data the matcher
//! extracted; [`NodeType`] is the payload-free discriminant the parser
//! dispatches on.
//!
//! # Late reclassification
//!
//! A dash line (`- "field" is <input>`) always lexes as
//! [`NodePayload::ListItem`]: only the parser knows whether an open
//! Constants block, Regular Expressions block, UI element or database
//! surrounds it. The parser classifies each list item into
//! [`NodeType::Constant`], [`NodeType::Regex`], [`NodeType::UiProperty`]
//! or [`NodeType::DatabaseProperty`] from its context; those four types
//! therefore never appear in a raw node stream.

use ecow::EcoString;

use super::Location;

/// The step keyword that begins a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Given,
    When,
    Then,
    And,
    Otherwise,
}

/// The closed set of node discriminants.
///
/// Adding a construct to the language means adding a variant here and
/// letting the compiler point at every `match` that must learn about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Language,
    Import,
    Tag,
    Feature,
    Background,
    VariantBackground,
    Scenario,
    Variant,
    TestCase,
    StepGiven,
    StepWhen,
    StepThen,
    StepAnd,
    StepOtherwise,
    ConstantBlock,
    Constant,
    RegexBlock,
    Regex,
    Table,
    TableRow,
    UiElement,
    UiProperty,
    Database,
    DatabaseProperty,
    BeforeAll,
    AfterAll,
    BeforeFeature,
    AfterFeature,
    BeforeEachScenario,
    AfterEachScenario,
    ListItem,
    Text,
}

impl NodeType {
    /// Returns the node type for a step keyword.
    #[must_use]
    pub const fn from_step(kind: StepKind) -> Self {
        match kind {
            StepKind::Given => Self::StepGiven,
            StepKind::When => Self::StepWhen,
            StepKind::Then => Self::StepThen,
            StepKind::And => Self::StepAnd,
            StepKind::Otherwise => Self::StepOtherwise,
        }
    }

    /// Returns `true` for the five step types.
    #[must_use]
    pub const fn is_step(self) -> bool {
        matches!(
            self,
            Self::StepGiven | Self::StepWhen | Self::StepThen | Self::StepAnd | Self::StepOtherwise
        )
    }

    /// Returns `true` for the six test-event block types.
    #[must_use]
    pub const fn is_test_event(self) -> bool {
        matches!(
            self,
            Self::BeforeAll
                | Self::AfterAll
                | Self::BeforeFeature
                | Self::AfterFeature
                | Self::BeforeEachScenario
                | Self::AfterEachScenario
        )
    }
}

/// The data a matcher extracted from a line.
///
/// Cheap to clone: all string data is [`EcoString`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePayload {
    /// A `#language: pt` directive. Carries the language tag.
    Language { value: EcoString },

    /// An `import "other.fabula"` declaration. Carries the quoted path.
    Import { value: EcoString },

    /// One tag from a tag line: `@slow` or `@feature(Login)`.
    Tag {
        name: EcoString,
        /// Parenthesised tag content, if any: `Login` in `@feature(Login)`.
        content: Option<EcoString>,
    },

    /// A `Feature: <name>` declaration.
    Feature { name: EcoString },

    /// A `Background:` block opener.
    Background,

    /// A `Variant Background:` block opener.
    VariantBackground,

    /// A `Scenario: <name>` declaration.
    Scenario { name: EcoString },

    /// A `Variant: <name>` declaration.
    Variant { name: EcoString },

    /// A `Test Case: <name>` declaration.
    TestCase { name: EcoString },

    /// A step sentence. `content` is the whole trimmed line, keyword
    /// included, since downstream recognition re-reads the sentence.
    Step { kind: StepKind, content: EcoString },

    /// A `Constants:` block opener.
    ConstantBlock,

    /// A `Regular Expressions:` block opener.
    RegexBlock,

    /// A `Table: <name>` declaration.
    Table { name: EcoString },

    /// A `| a | b |` row. Cells are trimmed, delimiters dropped.
    TableRow { cells: Vec<EcoString> },

    /// A `UI Element: <name>` declaration.
    UiElement { name: EcoString },

    /// A `Database: <name>` declaration.
    Database { name: EcoString },

    /// A test-event block opener (`Before All:` and friends).
    TestEvent { event: TestEventKind },

    /// A dash line. When the content has the `"name" is value` shape the
    /// lexer pre-splits it; the parser decides what the item *is*.
    ListItem {
        content: EcoString,
        name: Option<EcoString>,
        value: Option<EcoString>,
    },

    /// Any other non-blank line. The catch-all; never a lexing failure.
    Text { content: EcoString },
}

/// Which of the six test-event blocks a [`NodePayload::TestEvent`] opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestEventKind {
    BeforeAll,
    AfterAll,
    BeforeFeature,
    AfterFeature,
    BeforeEachScenario,
    AfterEachScenario,
}

impl NodePayload {
    /// Returns the discriminant for this payload.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Language { .. } => NodeType::Language,
            Self::Import { .. } => NodeType::Import,
            Self::Tag { .. } => NodeType::Tag,
            Self::Feature { .. } => NodeType::Feature,
            Self::Background => NodeType::Background,
            Self::VariantBackground => NodeType::VariantBackground,
            Self::Scenario { .. } => NodeType::Scenario,
            Self::Variant { .. } => NodeType::Variant,
            Self::TestCase { .. } => NodeType::TestCase,
            Self::Step { kind, .. } => NodeType::from_step(*kind),
            Self::ConstantBlock => NodeType::ConstantBlock,
            Self::RegexBlock => NodeType::RegexBlock,
            Self::Table { .. } => NodeType::Table,
            Self::TableRow { .. } => NodeType::TableRow,
            Self::UiElement { .. } => NodeType::UiElement,
            Self::Database { .. } => NodeType::Database,
            Self::TestEvent { event } => match event {
                TestEventKind::BeforeAll => NodeType::BeforeAll,
                TestEventKind::AfterAll => NodeType::AfterAll,
                TestEventKind::BeforeFeature => NodeType::BeforeFeature,
                TestEventKind::AfterFeature => NodeType::AfterFeature,
                TestEventKind::BeforeEachScenario => NodeType::BeforeEachScenario,
                TestEventKind::AfterEachScenario => NodeType::AfterEachScenario,
            },
            Self::ListItem { .. } => NodeType::ListItem,
            Self::Text { .. } => NodeType::Text,
        }
    }
}

/// A lexical node: a located payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Where the construct starts in the document.
    pub location: Location,
    /// What the matcher extracted.
    pub payload: NodePayload,
}

impl Node {
    /// Creates a new node.
    #[must_use]
    pub fn new(location: Location, payload: NodePayload) -> Self {
        Self { location, payload }
    }

    /// Returns the discriminant of this node's payload.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.payload.node_type()
    }
}
