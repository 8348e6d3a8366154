// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Line matchers.
//!
//! Every lexable construct has one [`Matcher`]. The lexer owns them as a
//! priority-ordered list and gives each line to the first matcher that
//! claims it; [`Shape::Text`] claims anything, so every non-blank,
//! non-comment line produces at least one node.
//!
//! Keyword matchers carry their word lists as mutable state so a
//! `#language:` switch can rewrite them in place. Matching is
//! case-insensitive on whole words: `Feature:` matches, `Featurette:`
//! does not.

use ecow::EcoString;

use crate::diagnostics::Diagnostic;
use crate::language::{KeywordDictionary, KeywordRole};

use super::{Location, Node, NodePayload, NodeType, StepKind, TestEventKind};

/// What one matcher produced for one line.
#[derive(Debug, Default)]
pub(super) struct LineMatch {
    pub(super) nodes: Vec<Node>,
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl LineMatch {
    fn node(node: Node) -> Self {
        Self {
            nodes: vec![node],
            diagnostics: Vec::new(),
        }
    }

    fn error(diagnostic: Diagnostic) -> Self {
        Self {
            nodes: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}

/// A named declaration target: `Keyword: <name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NamedTarget {
    Feature,
    Scenario,
    Variant,
    TestCase,
    Table,
    UiElement,
    Database,
}

impl NamedTarget {
    const fn node_type(self) -> NodeType {
        match self {
            Self::Feature => NodeType::Feature,
            Self::Scenario => NodeType::Scenario,
            Self::Variant => NodeType::Variant,
            Self::TestCase => NodeType::TestCase,
            Self::Table => NodeType::Table,
            Self::UiElement => NodeType::UiElement,
            Self::Database => NodeType::Database,
        }
    }

    const fn role(self) -> KeywordRole {
        match self {
            Self::Feature => KeywordRole::Feature,
            Self::Scenario => KeywordRole::Scenario,
            Self::Variant => KeywordRole::Variant,
            Self::TestCase => KeywordRole::TestCase,
            Self::Table => KeywordRole::Table,
            Self::UiElement => KeywordRole::UiElement,
            Self::Database => KeywordRole::Database,
        }
    }

    /// Canonical construct name for diagnostics.
    const fn label(self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::Scenario => "Scenario",
            Self::Variant => "Variant",
            Self::TestCase => "Test Case",
            Self::Table => "Table",
            Self::UiElement => "UI Element",
            Self::Database => "Database",
        }
    }

    fn payload(self, name: EcoString) -> NodePayload {
        match self {
            Self::Feature => NodePayload::Feature { name },
            Self::Scenario => NodePayload::Scenario { name },
            Self::Variant => NodePayload::Variant { name },
            Self::TestCase => NodePayload::TestCase { name },
            Self::Table => NodePayload::Table { name },
            Self::UiElement => NodePayload::UiElement { name },
            Self::Database => NodePayload::Database { name },
        }
    }
}

/// A nameless block opener: `Keyword:` with nothing after the colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockTarget {
    Background,
    VariantBackground,
    ConstantBlock,
    RegexBlock,
    Event(TestEventKind),
}

impl BlockTarget {
    const fn node_type(self) -> NodeType {
        match self {
            Self::Background => NodeType::Background,
            Self::VariantBackground => NodeType::VariantBackground,
            Self::ConstantBlock => NodeType::ConstantBlock,
            Self::RegexBlock => NodeType::RegexBlock,
            Self::Event(TestEventKind::BeforeAll) => NodeType::BeforeAll,
            Self::Event(TestEventKind::AfterAll) => NodeType::AfterAll,
            Self::Event(TestEventKind::BeforeFeature) => NodeType::BeforeFeature,
            Self::Event(TestEventKind::AfterFeature) => NodeType::AfterFeature,
            Self::Event(TestEventKind::BeforeEachScenario) => NodeType::BeforeEachScenario,
            Self::Event(TestEventKind::AfterEachScenario) => NodeType::AfterEachScenario,
        }
    }

    const fn role(self) -> KeywordRole {
        match self {
            Self::Background => KeywordRole::Background,
            Self::VariantBackground => KeywordRole::VariantBackground,
            Self::ConstantBlock => KeywordRole::ConstantBlock,
            Self::RegexBlock => KeywordRole::RegexBlock,
            Self::Event(TestEventKind::BeforeAll) => KeywordRole::BeforeAll,
            Self::Event(TestEventKind::AfterAll) => KeywordRole::AfterAll,
            Self::Event(TestEventKind::BeforeFeature) => KeywordRole::BeforeFeature,
            Self::Event(TestEventKind::AfterFeature) => KeywordRole::AfterFeature,
            Self::Event(TestEventKind::BeforeEachScenario) => KeywordRole::BeforeEachScenario,
            Self::Event(TestEventKind::AfterEachScenario) => KeywordRole::AfterEachScenario,
        }
    }

    fn payload(self) -> NodePayload {
        match self {
            Self::Background => NodePayload::Background,
            Self::VariantBackground => NodePayload::VariantBackground,
            Self::ConstantBlock => NodePayload::ConstantBlock,
            Self::RegexBlock => NodePayload::RegexBlock,
            Self::Event(event) => NodePayload::TestEvent { event },
        }
    }
}

/// The matching strategy of one matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `#language: pt`
    Language,
    /// `import "file.fabula"`
    Import,
    /// `@a @b(x)`
    Tag,
    /// `Keyword: <name>`
    Named(NamedTarget),
    /// `Keyword:` alone
    Block(BlockTarget),
    /// `Keyword <sentence>`
    Step(StepKind),
    /// `- <content>` (word list here is the dictionary's `is` spellings)
    ListItem,
    /// `| a | b |`
    TableRow,
    /// Catch-all.
    Text,
}

/// One line matcher: a shape plus its current keyword spellings.
#[derive(Debug)]
pub(super) struct Matcher {
    shape: Shape,
    words: Vec<EcoString>,
}

impl Matcher {
    /// Builds the full matcher list in priority order.
    ///
    /// Order matters in two places: `Otherwise` spellings such as
    /// `when invalid` must be tried before `When`, and the `Text`
    /// catch-all must come last.
    pub(super) fn all(dictionary: &KeywordDictionary) -> Vec<Matcher> {
        let shapes = [
            Shape::Language,
            Shape::Import,
            Shape::Tag,
            Shape::Named(NamedTarget::Feature),
            Shape::Block(BlockTarget::Background),
            Shape::Block(BlockTarget::VariantBackground),
            Shape::Named(NamedTarget::Scenario),
            Shape::Named(NamedTarget::TestCase),
            Shape::Named(NamedTarget::Variant),
            Shape::Block(BlockTarget::ConstantBlock),
            Shape::Block(BlockTarget::RegexBlock),
            Shape::Named(NamedTarget::Table),
            Shape::Named(NamedTarget::UiElement),
            Shape::Named(NamedTarget::Database),
            Shape::Block(BlockTarget::Event(TestEventKind::BeforeAll)),
            Shape::Block(BlockTarget::Event(TestEventKind::AfterAll)),
            Shape::Block(BlockTarget::Event(TestEventKind::BeforeFeature)),
            Shape::Block(BlockTarget::Event(TestEventKind::AfterFeature)),
            Shape::Block(BlockTarget::Event(TestEventKind::BeforeEachScenario)),
            Shape::Block(BlockTarget::Event(TestEventKind::AfterEachScenario)),
            Shape::Step(StepKind::Otherwise),
            Shape::Step(StepKind::Given),
            Shape::Step(StepKind::When),
            Shape::Step(StepKind::Then),
            Shape::Step(StepKind::And),
            Shape::ListItem,
            Shape::TableRow,
            Shape::Text,
        ];
        shapes
            .into_iter()
            .map(|shape| {
                let mut matcher = Matcher {
                    shape,
                    words: Vec::new(),
                };
                if let Some(role) = matcher.role() {
                    matcher.set_words(dictionary.words(role));
                }
                matcher
            })
            .collect()
    }

    /// The node type this matcher primarily produces.
    pub(super) const fn node_type(&self) -> NodeType {
        match self.shape {
            Shape::Language => NodeType::Language,
            Shape::Import => NodeType::Import,
            Shape::Tag => NodeType::Tag,
            Shape::Named(target) => target.node_type(),
            Shape::Block(target) => target.node_type(),
            Shape::Step(kind) => NodeType::from_step(kind),
            Shape::ListItem => NodeType::ListItem,
            Shape::TableRow => NodeType::TableRow,
            Shape::Text => NodeType::Text,
        }
    }

    /// The dictionary role feeding this matcher's word list.
    pub(super) const fn role(&self) -> Option<KeywordRole> {
        match self.shape {
            Shape::Language => Some(KeywordRole::Language),
            Shape::Import => Some(KeywordRole::Import),
            Shape::Named(target) => Some(target.role()),
            Shape::Block(target) => Some(target.role()),
            Shape::Step(StepKind::Given) => Some(KeywordRole::StepGiven),
            Shape::Step(StepKind::When) => Some(KeywordRole::StepWhen),
            Shape::Step(StepKind::Then) => Some(KeywordRole::StepThen),
            Shape::Step(StepKind::And) => Some(KeywordRole::StepAnd),
            Shape::Step(StepKind::Otherwise) => Some(KeywordRole::StepOtherwise),
            // List items split `name is value` content with the `is` words.
            Shape::ListItem => Some(KeywordRole::Is),
            Shape::Tag | Shape::TableRow | Shape::Text => None,
        }
    }

    /// True for the `Text` catch-all.
    pub(super) const fn is_fallback(&self) -> bool {
        matches!(self.shape, Shape::Text)
    }

    /// True for matchers the language directive itself is matched by.
    pub(super) const fn is_language(&self) -> bool {
        matches!(self.shape, Shape::Language)
    }

    /// Replaces the word list, lowercasing each spelling.
    pub(super) fn set_words(&mut self, words: &[EcoString]) {
        self.words = words
            .iter()
            .map(|w| EcoString::from(w.to_lowercase()))
            .collect();
    }

    /// Node types likely to follow a line this matcher claimed.
    ///
    /// Purely a dispatch hint: the lexer tries these matchers first on
    /// the next line and falls back to the full list, so a wrong hint
    /// costs time, never correctness. `Text` is never suggested. Where
    /// `StepOtherwise` and `StepWhen` both appear, `StepOtherwise` comes
    /// first, preserving their relative priority.
    pub(super) const fn suggested_next(&self) -> &'static [NodeType] {
        match self.shape {
            Shape::Language => &[NodeType::Import, NodeType::Tag, NodeType::Feature],
            Shape::Import => &[
                NodeType::Import,
                NodeType::Tag,
                NodeType::Feature,
                NodeType::Variant,
                NodeType::TestCase,
            ],
            Shape::Tag => &[
                NodeType::Tag,
                NodeType::Feature,
                NodeType::Scenario,
                NodeType::Variant,
                NodeType::TestCase,
                NodeType::UiElement,
                NodeType::ListItem,
            ],
            Shape::Named(NamedTarget::Feature) => &[
                NodeType::Tag,
                NodeType::Background,
                NodeType::Scenario,
                NodeType::UiElement,
            ],
            Shape::Named(NamedTarget::Scenario) => &[
                NodeType::Tag,
                NodeType::VariantBackground,
                NodeType::Variant,
                NodeType::StepGiven,
            ],
            Shape::Named(NamedTarget::Variant) | Shape::Named(NamedTarget::TestCase) => &[
                NodeType::StepGiven,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::Tag,
            ],
            Shape::Named(NamedTarget::Table) => &[NodeType::TableRow],
            Shape::Named(NamedTarget::UiElement) | Shape::Named(NamedTarget::Database) => {
                &[NodeType::ListItem, NodeType::Tag]
            }
            Shape::Block(BlockTarget::Background | BlockTarget::VariantBackground) => &[
                NodeType::StepGiven,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::StepThen,
            ],
            Shape::Block(BlockTarget::ConstantBlock | BlockTarget::RegexBlock) => {
                &[NodeType::ListItem]
            }
            Shape::Block(BlockTarget::Event(_)) => &[
                NodeType::StepGiven,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::StepThen,
            ],
            Shape::Step(StepKind::Given) => &[
                NodeType::StepAnd,
                NodeType::StepGiven,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::StepThen,
            ],
            Shape::Step(StepKind::When) => &[
                NodeType::StepAnd,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::StepThen,
            ],
            Shape::Step(StepKind::Then) => &[
                NodeType::StepAnd,
                NodeType::StepThen,
                NodeType::Scenario,
                NodeType::Variant,
            ],
            Shape::Step(StepKind::And) => &[
                NodeType::StepAnd,
                NodeType::StepOtherwise,
                NodeType::StepWhen,
                NodeType::StepThen,
            ],
            Shape::Step(StepKind::Otherwise) => &[NodeType::StepAnd],
            Shape::ListItem => &[
                NodeType::ListItem,
                NodeType::Tag,
                NodeType::StepOtherwise,
                NodeType::UiElement,
            ],
            Shape::TableRow => &[NodeType::TableRow],
            Shape::Text => &[],
        }
    }

    /// Tries this matcher against one line.
    ///
    /// `None` means the line is not this matcher's shape and the next
    /// matcher should be tried. `Some` consumes the line, possibly with
    /// zero nodes (a claimed-but-malformed line reports diagnostics
    /// instead).
    pub(super) fn try_match(&self, line: &str, line_number: u32) -> Option<LineMatch> {
        match self.shape {
            Shape::Language => self.match_language(line, line_number),
            Shape::Import => self.match_import(line, line_number),
            Shape::Tag => match_tags(line, line_number),
            Shape::Named(target) => self.match_named(target, line, line_number),
            Shape::Block(target) => self.match_block(target, line, line_number),
            Shape::Step(kind) => self.match_step(kind, line, line_number),
            Shape::ListItem => self.match_list_item(line, line_number),
            Shape::TableRow => match_table_row(line, line_number),
            Shape::Text => Some(match_text(line, line_number)),
        }
    }

    fn match_language(&self, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim_start();
        let after_hash = text.strip_prefix('#')?;
        let location = Location::new(line_number, indent + 1);
        let keyword_text = after_hash.trim_start();
        let (_, rest) = keyword_match(keyword_text, &self.words)?;
        let rest = rest.trim_start();
        let value = rest.strip_prefix(':')?.trim();
        if value.is_empty() {
            return Some(LineMatch::error(Diagnostic::lexical_error(
                "expected a language tag after `#language:`",
                location,
            )));
        }
        Some(LineMatch::node(Node::new(
            location,
            NodePayload::Language {
                value: value.into(),
            },
        )))
    }

    fn match_import(&self, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim_start();
        let (_, rest) = keyword_match(text, &self.words)?;
        let location = Location::new(line_number, indent + 1);
        let rest = rest.trim();
        let Some(value) = quoted(rest) else {
            return Some(LineMatch::error(Diagnostic::lexical_error(
                "expected a double-quoted file path after `import`",
                location,
            )));
        };
        if value.is_empty() {
            return Some(LineMatch::error(Diagnostic::lexical_error(
                "import path must not be empty",
                location,
            )));
        }
        Some(LineMatch::node(Node::new(
            location,
            NodePayload::Import {
                value: value.into(),
            },
        )))
    }

    fn match_named(&self, target: NamedTarget, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim_start();
        let (_, rest) = keyword_match(text, &self.words)?;
        let name = rest.trim_start().strip_prefix(':')?.trim();
        let location = Location::new(line_number, indent + 1);
        let mut result = LineMatch::node(Node::new(location, target.payload(name.into())));
        if name.is_empty() {
            result.diagnostics.push(Diagnostic::lexical_error(
                format!("expected a name after `{}:`", target.label()),
                location,
            ));
        }
        Some(result)
    }

    fn match_block(&self, target: BlockTarget, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim_start();
        let (_, rest) = keyword_match(text, &self.words)?;
        let rest = rest.trim_start().strip_prefix(':')?;
        if !rest.trim().is_empty() {
            return None;
        }
        Some(LineMatch::node(Node::new(
            Location::new(line_number, indent + 1),
            target.payload(),
        )))
    }

    fn match_step(&self, kind: StepKind, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim_end();
        let trimmed = text.trim_start();
        let (_, rest) = keyword_match(trimmed, &self.words)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let location = Location::new(line_number, indent + 1);
        let mut result = LineMatch::node(Node::new(
            location,
            NodePayload::Step {
                kind,
                content: trimmed.into(),
            },
        ));
        if rest.trim().is_empty() {
            result.diagnostics.push(Diagnostic::lexical_warning(
                "step sentence has no content after its keyword",
                location,
            ));
        }
        Some(result)
    }

    fn match_list_item(&self, line: &str, line_number: u32) -> Option<LineMatch> {
        let indent = indent_columns(line);
        let text = line.trim();
        let rest = text.strip_prefix('-')?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let content = rest.trim();
        let (name, value) = split_name_value(content, &self.words);
        Some(LineMatch::node(Node::new(
            Location::new(line_number, indent + 1),
            NodePayload::ListItem {
                content: content.into(),
                name,
                value,
            },
        )))
    }
}

/// Matches a whole line of `@tag` / `@tag(content)` entries.
///
/// Recovery is per tag: a bad entry reports a diagnostic and scanning
/// continues at the next `@`.
fn match_tags(line: &str, line_number: u32) -> Option<LineMatch> {
    if !line.trim_start().starts_with('@') {
        return None;
    }
    let mut result = LineMatch::default();
    let mut chars = line.char_indices().peekable();
    let mut column: u32 = 0;

    while let Some((index, c)) = chars.next() {
        column += 1;
        if c.is_whitespace() {
            continue;
        }
        if c != '@' {
            result.diagnostics.push(Diagnostic::lexical_error(
                format!("unexpected `{}` in tag line", &line[index..].trim_end()),
                Location::new(line_number, column),
            ));
            break;
        }
        let tag_location = Location::new(line_number, column);
        let mut name = EcoString::new();
        let mut content: Option<EcoString> = None;
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() || c == '@' || c == '(' {
                break;
            }
            name.push(c);
            chars.next();
            column += 1;
        }
        if name.is_empty() {
            result.diagnostics.push(Diagnostic::lexical_error(
                "expected a tag name after `@`",
                tag_location,
            ));
            continue;
        }
        if let Some(&(_, '(')) = chars.peek() {
            chars.next();
            column += 1;
            let mut inner = EcoString::new();
            let mut closed = false;
            for (_, c) in chars.by_ref() {
                column += 1;
                if c == ')' {
                    closed = true;
                    break;
                }
                inner.push(c);
            }
            if closed {
                content = Some(EcoString::from(inner.trim()));
            } else {
                result.diagnostics.push(Diagnostic::lexical_error(
                    format!("unclosed `(` in tag `@{name}`"),
                    tag_location,
                ));
            }
        }
        result
            .nodes
            .push(Node::new(tag_location, NodePayload::Tag { name, content }));
    }
    Some(result)
}

fn match_table_row(line: &str, line_number: u32) -> Option<LineMatch> {
    let indent = indent_columns(line);
    let text = line.trim();
    if text.len() < 2 || !text.starts_with('|') || !text.ends_with('|') {
        return None;
    }
    let interior = &text[1..text.len() - 1];
    let cells = interior
        .split('|')
        .map(|cell| EcoString::from(cell.trim()))
        .collect();
    Some(LineMatch::node(Node::new(
        Location::new(line_number, indent + 1),
        NodePayload::TableRow { cells },
    )))
}

fn match_text(line: &str, line_number: u32) -> LineMatch {
    let indent = indent_columns(line);
    LineMatch::node(Node::new(
        Location::new(line_number, indent + 1),
        NodePayload::Text {
            content: line.trim().into(),
        },
    ))
}

/// Counts leading whitespace in characters.
fn indent_columns(line: &str) -> u32 {
    line.chars().take_while(|c| c.is_whitespace()).count() as u32
}

/// Finds the longest word that prefixes `text` case-insensitively at a
/// word boundary. Returns the matched byte length and the remainder.
fn keyword_match<'a>(text: &'a str, words: &[EcoString]) -> Option<(usize, &'a str)> {
    let mut best: Option<usize> = None;
    for word in words {
        if let Some(len) = starts_with_ignore_case(text, word) {
            let rest = &text[len..];
            let bounded = rest
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric() && c != '_');
            if bounded && best.is_none_or(|b| len > b) {
                best = Some(len);
            }
        }
    }
    best.map(|len| (len, &text[len..]))
}

/// Case-insensitive prefix test returning the consumed byte length.
fn starts_with_ignore_case(text: &str, word: &str) -> Option<usize> {
    let mut text_chars = text.char_indices();
    for wc in word.chars() {
        let (_, tc) = text_chars.next()?;
        if !tc.to_lowercase().eq(wc.to_lowercase()) {
            return None;
        }
    }
    Some(text_chars.next().map_or(text.len(), |(i, _)| i))
}

/// Returns the interior of a double-quoted string, if `text` is one.
fn quoted(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('"')?;
    let inner = rest.strip_suffix('"')?;
    if inner.contains('"') {
        return None;
    }
    Some(inner)
}

/// Splits `name is value` content on the first unquoted `is` spelling.
///
/// Both sides must be non-empty; surrounding double quotes are stripped
/// from each side. Returns `(None, None)` when the shape is absent.
fn split_name_value(
    content: &str,
    is_words: &[EcoString],
) -> (Option<EcoString>, Option<EcoString>) {
    let mut in_quotes = false;
    let mut prev_is_space = true;
    for (index, c) in content.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
            prev_is_space = false;
            continue;
        }
        if !in_quotes && prev_is_space {
            for word in is_words {
                let Some(len) = starts_with_ignore_case(&content[index..], word) else {
                    continue;
                };
                let after = &content[index + len..];
                if !after.starts_with(char::is_whitespace) {
                    continue;
                }
                let left = content[..index].trim_end();
                let right = after.trim_start();
                if !left.is_empty() && !right.is_empty() {
                    return (
                        Some(unquote(left).into()),
                        Some(unquote(right).into()),
                    );
                }
            }
        }
        prev_is_space = c.is_whitespace();
    }
    (None, None)
}

/// Strips one pair of surrounding double quotes, if present.
fn unquote(text: &str) -> &str {
    quoted(text).unwrap_or(text)
}
