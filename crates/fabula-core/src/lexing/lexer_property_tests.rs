// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Fabula lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics**: arbitrary line input always lexes
//! 2. **Blank lines are silent**: whitespace-only lines contribute nothing
//! 3. **No line is lost**: every other line contributes a node or diagnostic
//! 4. **Locations are honest**: nodes carry the fed line number, columns
//!    stay within the line
//! 5. **Lexer is deterministic**: same lines, same nodes and diagnostics
//! 6. **Valid fragments lex cleanly**: known-good lines produce no errors
//! 7. **Reset is complete**: a reset lexer behaves like a fresh one

use proptest::prelude::*;

use crate::language::BundledDictionaries;

use super::Lexer;

// ============================================================================
// Generators
// ============================================================================

/// Known-valid lines that must lex without errors or warnings.
const VALID_LINES: &[&str] = &[
    "#language: en",
    "import \"users.fabula\"",
    "@fast @web(chrome, firefox)",
    "Feature: Account management",
    "  free-form description text",
    "Background:",
    "Variant Background:",
    "Scenario: Deleting an account",
    "Variant: Happy path",
    "Test Case: Deleting an account - 1",
    "  Given that I am on the account page",
    "  When I click delete",
    "  Then my account is removed",
    "    And I am logged out",
    "  Otherwise I see an error",
    "Constants:",
    "- \"max attempts\" is 3",
    "Regular Expressions:",
    "- \"name\" is \"[A-Za-z ]{2,50}\"",
    "Table: Users",
    "| login | password |",
    "| bob | 123456 |",
    "UI Element: Username",
    "- id is \"#username\"",
    "Database: TestDB",
    "- type is \"mysql\"",
    "Before All:",
    "After Each Scenario:",
];

fn valid_line() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_LINES).prop_map(std::string::ToString::to_string)
}

fn arbitrary_line() -> impl Strategy<Value = String> {
    "\\PC{0,200}"
}

fn arbitrary_document() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arbitrary_line(), 0..12)
}

fn new_lexer() -> Lexer {
    Lexer::new(Box::new(BundledDictionaries), "en").unwrap()
}

fn feed(lexer: &mut Lexer, lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        lexer.add_line(line, (i + 1) as u32);
    }
}

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the lexer never panics on arbitrary line input.
    #[test]
    fn lexer_never_panics(lines in arbitrary_document()) {
        let mut lexer = new_lexer();
        feed(&mut lexer, &lines);
    }

    /// Property 2: whitespace-only lines contribute nothing.
    #[test]
    fn blank_lines_are_silent(spaces in "[ \\t]{0,40}") {
        let mut lexer = new_lexer();
        prop_assert!(!lexer.add_line(&spaces, 1));
        prop_assert!(lexer.nodes().is_empty());
        prop_assert!(lexer.diagnostics().is_empty());
    }

    /// Property 3: every non-blank, non-comment line contributes at
    /// least one node or one diagnostic, and `add_line` says so.
    #[test]
    fn no_line_is_lost(line in arbitrary_line()) {
        let trimmed = line.trim();
        prop_assume!(!trimmed.is_empty() && !trimmed.starts_with('#'));

        let mut lexer = new_lexer();
        let significant = lexer.add_line(&line, 1);
        let contributed = lexer.nodes().len() + lexer.diagnostics().len();
        prop_assert!(significant, "add_line returned false for {line:?}");
        prop_assert!(contributed > 0, "nothing produced for {line:?}");
    }

    /// Property 4: nodes carry the line number they were fed with, and
    /// columns stay within the line.
    #[test]
    fn locations_are_honest(lines in arbitrary_document()) {
        let mut lexer = new_lexer();
        feed(&mut lexer, &lines);
        for node in lexer.nodes() {
            let line_number = node.location.line();
            prop_assert!(line_number >= 1 && line_number as usize <= lines.len());
            let line = &lines[line_number as usize - 1];
            let width = line.chars().count() as u32;
            prop_assert!(node.location.column() >= 1);
            prop_assert!(
                node.location.column() <= width.max(1),
                "column {} beyond line {line:?}",
                node.location.column(),
            );
        }
    }

    /// Property 5: lexing is deterministic.
    #[test]
    fn lexer_deterministic(lines in arbitrary_document()) {
        let mut first = new_lexer();
        let mut second = new_lexer();
        feed(&mut first, &lines);
        feed(&mut second, &lines);
        prop_assert_eq!(first.nodes(), second.nodes());
        prop_assert_eq!(first.diagnostics(), second.diagnostics());
    }

    /// Property 6: known-valid lines lex without diagnostics.
    #[test]
    fn valid_lines_lex_cleanly(line in valid_line()) {
        let mut lexer = new_lexer();
        lexer.add_line(&line, 1);
        prop_assert!(
            lexer.diagnostics().is_empty(),
            "diagnostics for {line:?}: {:?}",
            lexer.diagnostics(),
        );
        prop_assert!(!lexer.nodes().is_empty());
    }

    /// Property 7: after a reset the lexer behaves like a fresh one.
    #[test]
    fn reset_is_complete(first_doc in arbitrary_document(), second_doc in arbitrary_document()) {
        let mut reused = new_lexer();
        feed(&mut reused, &first_doc);
        reused.reset();
        feed(&mut reused, &second_doc);

        let mut fresh = new_lexer();
        feed(&mut fresh, &second_doc);

        prop_assert_eq!(reused.nodes(), fresh.nodes());
        prop_assert_eq!(reused.diagnostics(), fresh.diagnostics());
        prop_assert_eq!(reused.language(), fresh.language());
    }
}
