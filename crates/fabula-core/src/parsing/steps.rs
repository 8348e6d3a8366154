// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subparser for step sentences.
//!
//! Steps attach to whichever region is open. Ordering (`Given` before
//! `When` before `Then`) is checked against the immediately preceding
//! sentence; an `And` continues any kind, so a primary step right after
//! an `And` is always in order. Test cases are exempt because generated
//! content repeats groups freely.

use crate::ast::Step;
use crate::lexing::{Node, NodePayload, NodeType, StepKind};

use super::context::{ActiveScope, ParsingContext};
use super::Parser;

fn kind_label(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Given => "Given",
        StepKind::When => "When",
        StepKind::Then => "Then",
        StepKind::And => "And",
        StepKind::Otherwise => "Otherwise",
    }
}

fn misplaced_message(kind: StepKind) -> String {
    format!(
        "a `{}` sentence must be inside a scenario, variant, test case, background or test event block",
        kind_label(kind)
    )
}

impl Parser {
    pub(super) fn parse_step(
        &mut self,
        node: &Node,
        context: &mut ParsingContext<'_>,
    ) -> Option<NodeType> {
        let NodePayload::Step { kind, content } = &node.payload else {
            return None;
        };
        let step = Step {
            kind: *kind,
            content: content.clone(),
            location: node.location,
        };
        match step.kind {
            StepKind::Otherwise => self.parse_otherwise(step, context),
            StepKind::And => self.parse_and(step, context),
            StepKind::Given | StepKind::When | StepKind::Then => self.parse_primary(step, context),
        }
    }

    /// `Otherwise` opens the alternate-flow sentences of the current
    /// UI element property.
    fn parse_otherwise(&mut self, step: Step, context: &mut ParsingContext<'_>) -> Option<NodeType> {
        if context.scope != ActiveScope::UiProperty {
            self.error(
                "an Otherwise sentence is only valid after a ui element property",
                step.location,
            );
            return None;
        }
        let property = context.current_property_mut()?;
        property.otherwise_sentences.push(step);
        Some(NodeType::StepOtherwise)
    }

    /// `And` continues the previous sentence, wherever that was.
    fn parse_and(&mut self, step: Step, context: &mut ParsingContext<'_>) -> Option<NodeType> {
        if context.scope == ActiveScope::UiProperty {
            let location = step.location;
            let property = context.current_property_mut()?;
            if property.otherwise_sentences.is_empty() {
                self.error("an And sentence must follow another sentence", location);
                return None;
            }
            property.otherwise_sentences.push(step);
            return Some(NodeType::StepAnd);
        }
        if !context.scope.accepts_steps() {
            self.error(misplaced_message(StepKind::And), step.location);
            return None;
        }
        if !context.last_parsed.is_some_and(NodeType::is_step) {
            self.error("an And sentence must follow another sentence", step.location);
            return None;
        }
        let sentences = context.step_sentences_mut()?;
        sentences.push(step);
        Some(NodeType::StepAnd)
    }

    /// `Given`, `When` and `Then`.
    fn parse_primary(&mut self, step: Step, context: &mut ParsingContext<'_>) -> Option<NodeType> {
        let kind = step.kind;
        if !context.scope.accepts_steps() {
            self.error(misplaced_message(kind), step.location);
            return None;
        }
        if context.scope.is_variant_background() && kind == StepKind::Then {
            self.error(
                "a Then sentence is not allowed in a variant background",
                step.location,
            );
            return None;
        }
        let enforce_order = context.scope != ActiveScope::TestCase;
        let location = step.location;
        let sentences = context.step_sentences_mut()?;
        if enforce_order {
            let prior = sentences.last().map(|step| step.kind);
            match kind {
                StepKind::Given if matches!(prior, Some(StepKind::When | StepKind::Then)) => {
                    self.error(
                        "a Given sentence must come before When and Then sentences",
                        location,
                    );
                    return None;
                }
                StepKind::When if prior == Some(StepKind::Then) => {
                    self.error("a When sentence must come before Then sentences", location);
                    return None;
                }
                _ => {}
            }
        }
        sentences.push(step);
        Some(NodeType::from_step(kind))
    }
}
