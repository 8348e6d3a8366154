// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Late reclassification of list items.
//!
//! A dash line is just a `ListItem` to the lexer. Here the open region
//! decides what it was all along: a constant, a regular expression, a
//! UI element property or a database property.

use ecow::EcoString;

use crate::ast::{Constant, DatabaseProperty, RegexEntry, UiProperty};
use crate::lexing::{Location, Node, NodePayload, NodeType};

use super::context::{ActiveScope, ParsingContext};
use super::{collect_tags, NodeCursor, Parser};

impl Parser {
    pub(super) fn parse_list_item(
        &mut self,
        node: &Node,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::ListItem {
            content,
            name,
            value,
        } = &node.payload
        else {
            return None;
        };
        match context.scope {
            ActiveScope::ConstantBlock => {
                self.parse_constant_item(node.location, name.as_ref(), value.as_ref(), context)
            }
            ActiveScope::RegexBlock => {
                self.parse_regex_item(node.location, name.as_ref(), value.as_ref(), context)
            }
            ActiveScope::UiElement | ActiveScope::UiProperty => {
                self.parse_ui_property_item(content, node.location, cursor, context)
            }
            ActiveScope::Database => self.parse_database_item(
                content,
                name.clone(),
                value.clone(),
                node.location,
                context,
            ),
            _ => {
                self.error("list item does not belong to any open block", node.location);
                None
            }
        }
    }

    fn parse_constant_item(
        &mut self,
        location: Location,
        name: Option<&EcoString>,
        value: Option<&EcoString>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let (Some(name), Some(value)) = (name, value) else {
            self.error("a constant must have the form `- \"name\" is value`", location);
            return None;
        };
        let block = context.doc.constant_block.as_mut()?;
        block.constants.push(Constant {
            name: name.clone(),
            value: value.clone(),
            location,
        });
        Some(NodeType::Constant)
    }

    fn parse_regex_item(
        &mut self,
        location: Location,
        name: Option<&EcoString>,
        value: Option<&EcoString>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let (Some(name), Some(value)) = (name, value) else {
            self.error(
                "a regular expression must have the form `- \"name\" is \"pattern\"`",
                location,
            );
            return None;
        };
        let block = context.doc.regex_block.as_mut()?;
        block.entries.push(RegexEntry {
            name: name.clone(),
            value: value.clone(),
            location,
        });
        Some(NodeType::Regex)
    }

    /// A property line of the current UI element. Collects preceding
    /// tags and becomes the target for `Otherwise` sentences.
    fn parse_ui_property_item(
        &mut self,
        content: &EcoString,
        location: Location,
        cursor: &mut NodeCursor<'_>,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let tags = collect_tags(cursor);
        let element = context.current_element_mut()?;
        element
            .items
            .push(UiProperty::new(content.clone(), location, tags));
        let index = element.items.len() - 1;
        context.current_ui_property = Some(index);
        context.scope = ActiveScope::UiProperty;
        Some(NodeType::UiProperty)
    }

    /// A property line of the current database. The lexed `name is
    /// value` split is kept when present; recognition normalises later.
    fn parse_database_item(
        &mut self,
        content: &EcoString,
        name: Option<EcoString>,
        value: Option<EcoString>,
        location: Location,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let database = context.current_database_mut()?;
        database.properties.push(DatabaseProperty {
            content: content.clone(),
            location,
            name,
            value,
            property: None,
        });
        Some(NodeType::DatabaseProperty)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{error_messages, parse_lines};

    #[test]
    fn constants_collect_named_values() {
        let parsed = parse_lines(&[
            "Constants:",
            "  - \"pi\" is 3.14159",
            "  - \"app name\" is \"Fabula\"",
        ]);
        assert!(!parsed.parser.has_errors());
        let block = parsed.document.constant_block.unwrap();
        assert_eq!(block.constants.len(), 2);
        assert_eq!(block.constants[0].name, "pi");
        assert_eq!(block.constants[0].value, "3.14159");
        assert_eq!(block.constants[1].name, "app name");
        assert_eq!(block.constants[1].value, "Fabula");
    }

    #[test]
    fn malformed_constant_is_rejected() {
        let parsed = parse_lines(&["Constants:", "  - just some text"]);
        let messages = error_messages(&parsed.parser);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("constant"), "got {messages:?}");
        assert!(parsed.document.constant_block.unwrap().constants.is_empty());
    }

    #[test]
    fn regex_entries_collect() {
        let parsed = parse_lines(&[
            "Regular Expressions:",
            "  - \"code\" is \"[A-Z]{3}-[0-9]+\"",
        ]);
        assert!(!parsed.parser.has_errors());
        let block = parsed.document.regex_block.unwrap();
        assert_eq!(block.entries[0].name, "code");
        assert_eq!(block.entries[0].value, "[A-Z]{3}-[0-9]+");
    }

    #[test]
    fn ui_properties_collect_with_tags() {
        let parsed = parse_lines(&[
            "Feature: F",
            "UI Element: Username",
            "  @required",
            "  - id is \"#username\"",
            "  - maximum length is 30",
        ]);
        assert!(!parsed.parser.has_errors());
        let feature = parsed.document.feature.unwrap();
        let element = &feature.ui_elements[0];
        assert_eq!(element.items.len(), 2);
        assert_eq!(element.items[0].tags[0].name, "required");
        assert_eq!(element.items[0].content, "id is \"#username\"");
        assert!(element.items[1].tags.is_empty());
    }

    #[test]
    fn database_properties_keep_raw_content() {
        let parsed = parse_lines(&[
            "Database: Main",
            "  - type is \"postgres\"",
            "  - host is \"localhost\"",
            "  - just a note",
        ]);
        assert!(!parsed.parser.has_errors());
        let database = &parsed.document.databases[0];
        assert_eq!(database.properties.len(), 3);
        assert_eq!(database.properties[0].name.as_deref(), Some("type"));
        assert_eq!(database.properties[0].value.as_deref(), Some("postgres"));
        assert!(database.properties[2].name.is_none());
        assert_eq!(database.properties[2].content, "just a note");
    }

    #[test]
    fn orphan_list_item_is_an_error() {
        let parsed = parse_lines(&["- floating entry"]);
        let messages = error_messages(&parsed.parser);
        assert_eq!(
            messages,
            vec!["list item does not belong to any open block".to_string()]
        );
    }

    #[test]
    fn scenario_scope_does_not_accept_list_items() {
        let parsed = parse_lines(&[
            "Feature: F",
            "Scenario: S",
            "  - stray item",
        ]);
        assert_eq!(parsed.parser.errors().count(), 1);
    }
}
