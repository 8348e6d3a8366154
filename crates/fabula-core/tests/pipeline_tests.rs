// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the document pipeline.
//!
//! Each test drives the public API the way a compiler front end would:
//! one lexer/parser pair processes every file of a specification in
//! sequence, the documents land in a [`Specification`], and the
//! semantic passes run over the whole set.

use fabula_core::diagnostics::{DiagnosticStage, Severity};
use fabula_core::prelude::*;
use fabula_core::semantic_analysis;

/// Processes `(path, lines)` pairs with a single lexer/parser pair.
fn build_spec(documents: &[(&str, &[&str])]) -> Specification {
    let mut lexer = Lexer::new(Box::new(BundledDictionaries), "en").unwrap();
    let mut parser = Parser::new();
    let mut spec = Specification::new("");
    for (path, lines) in documents {
        let document = process_document(
            &mut lexer,
            &mut parser,
            FileInfo::new(*path),
            lines.iter().copied(),
        );
        spec.add_document(document);
    }
    spec
}

#[test]
fn a_clean_multi_document_specification_analyses_without_diagnostics() {
    let mut spec = build_spec(&[
        (
            "login.fabula",
            &[
                "#language:en",
                "",
                "@web",
                "Feature: Login",
                "  As a visitor",
                "  I want to sign in",
                "",
                "Background:",
                "  Given that the database is seeded",
                "",
                "Scenario: Successful login",
                "  Given that I am on the login page",
                "  When I fill my credentials",
                "    And I press the sign in button",
                "  Then I see the dashboard",
                "",
                "Variant: With remember me",
                "  Given that I am on the login page",
                "",
                "UI Element: Username",
                "  - id is \"#username\"",
                "  - maximum length is 30",
                "    Otherwise I must see \"username too long\"",
            ][..],
        ),
        (
            "data.fabula",
            &[
                "Constants:",
                "  - \"minimum age\" is 18",
                "",
                "Table: Users",
                "  | name  | age |",
                "  | alice | 33  |",
                "",
                "Database: Main",
                "  - type is \"postgres\"",
                "  - host is \"localhost\"",
            ][..],
        ),
        (
            "login_extras.fabula",
            &[
                "import \"login.fabula\"",
                "",
                "Variant: Expired session",
                "  Given that my session expired",
            ][..],
        ),
    ]);

    let diagnostics = semantic_analysis::analyse(&mut spec);
    assert!(diagnostics.is_empty(), "got {diagnostics:?}");

    // The orphan variant moved into the imported feature.
    let login = spec.documents()[0].feature.as_ref().unwrap();
    assert_eq!(login.scenarios.len(), 1);
    assert_eq!(login.scenarios[0].variants.len(), 1);
    assert_eq!(login.variants.len(), 1);
    assert_eq!(login.variants[0].name, "Expired session");
    assert_eq!(
        login.variants[0].declared_in.as_ref().map(|p| p.as_str()),
        Some("login_extras.fabula")
    );
    assert!(spec.documents()[2].variants.is_empty());
}

#[test]
fn every_construct_of_one_document_parses() {
    let mut spec = build_spec(&[(
        "everything.fabula",
        &[
            "#language:en",
            "# a full-line comment is skipped",
            "import \"other.fabula\"",
            "",
            "Before All:",
            "  Given that the suite is prepared",
            "",
            "@tagged",
            "Feature: Everything",
            "  One line of description",
            "",
            "Before Feature:",
            "  Given that the feature is prepared",
            "",
            "Background:",
            "  Given that the database is seeded",
            "",
            "Variant Background:",
            "  Given that I am logged in",
            "",
            "Scenario: Main flow",
            "  Given that I start",
            "  When I act",
            "  Then I finish",
            "",
            "Variant: One",
            "  Given that I start variant one",
            "",
            "Test Case: Main flow - 1",
            "  Given that I start",
            "  Then I finish",
            "",
            "Constants:",
            "  - \"pi\" is 3.14",
            "",
            "Regular Expressions:",
            "  - \"code\" is \"[A-Z]+\"",
            "",
            "Table: Users",
            "  | name |",
            "",
            "Database: Main",
            "  - type is \"mysql\"",
            "",
            "UI Element: Search",
            "  - id is \"#search\"",
        ][..],
    )]);

    let document = &spec.documents()[0];
    assert!(
        !document.has_errors(),
        "errors: {:?}",
        document.file_errors
    );
    assert!(document.language.is_some());
    assert_eq!(document.imports.len(), 1);
    assert!(document.events.before_all.is_some());
    assert!(document.events.before_feature.is_some());

    let feature = document.feature.as_ref().unwrap();
    assert_eq!(feature.tags.len(), 1);
    assert_eq!(feature.description.len(), 1);
    assert!(feature.background.is_some());
    assert!(feature.variant_background.is_some());
    assert_eq!(feature.scenarios.len(), 1);
    assert_eq!(feature.scenarios[0].variants.len(), 1);
    assert_eq!(feature.ui_elements.len(), 1);

    assert_eq!(document.test_cases.len(), 1);
    assert!(document.constant_block.is_some());
    assert!(document.regex_block.is_some());
    assert_eq!(document.tables.len(), 1);
    assert_eq!(document.databases.len(), 1);

    // The import target is missing, which is a warning, not an error.
    let diagnostics = semantic_analysis::analyse(&mut spec);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn a_minimal_tagged_feature_parses_cleanly() {
    let spec = build_spec(&[(
        "mini.fabula",
        &["#language:en", "@important", "Feature: My feature"][..],
    )]);

    let document = &spec.documents()[0];
    assert!(!document.has_errors());
    assert!(document.file_warnings.is_empty());
    let feature = document.feature.as_ref().unwrap();
    assert_eq!(feature.name, "My feature");
    assert_eq!(feature.tags.len(), 1);
    assert_eq!(feature.tags[0].name, "important");
}

#[test]
fn portuguese_documents_share_the_pipeline() {
    let spec = build_spec(&[(
        "entrar.fabula",
        &[
            "#language:pt",
            "",
            "Funcionalidade: Entrar",
            "",
            "Cenário: Entrada com sucesso",
            "  Dado que estou na página de entrada",
            "  Quando preencho minhas credenciais",
            "  Então vejo o painel",
        ][..],
    )]);

    let document = &spec.documents()[0];
    assert!(!document.has_errors(), "errors: {:?}", document.file_errors);
    let feature = document.feature.as_ref().unwrap();
    assert_eq!(feature.name, "Entrar");
    assert_eq!(feature.scenarios[0].sentences.len(), 3);
}

#[test]
fn import_cycles_are_reported_on_every_member() {
    let mut spec = build_spec(&[
        ("a.fabula", &["import \"b.fabula\"", "Feature: A"][..]),
        ("b.fabula", &["import \"a.fabula\"", "Feature: B"][..]),
    ]);

    let diagnostics = semantic_analysis::analyse(&mut spec);
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|d| d.stage == DiagnosticStage::Semantic));
    assert!(errors[0].message.starts_with("cyclic imports:"));
    for document in spec.documents() {
        assert_eq!(document.file_errors.len(), 1);
    }
}

#[test]
fn diagnostics_carry_their_stage_through_the_pipeline() {
    let mut spec = build_spec(&[
        (
            "broken.fabula",
            &[
                "#language:",           // lexical: missing value
                "Scenario: Too early",  // syntactic: no feature yet
                "Feature: Broken",
            ][..],
        ),
        ("dup.fabula", &["Feature: Broken"][..]),
    ]);

    let semantic = semantic_analysis::analyse(&mut spec);
    assert!(semantic.iter().any(|d| d.stage == DiagnosticStage::Semantic));

    let broken = &spec.documents()[0];
    let stages: Vec<_> = broken.file_errors.iter().map(|d| d.stage).collect();
    assert!(stages.contains(&DiagnosticStage::Lexical));
    assert!(stages.contains(&DiagnosticStage::Syntactic));
    assert!(stages.contains(&DiagnosticStage::Semantic));
}

#[test]
fn recognised_queries_are_checked_against_the_whole_specification() {
    let mut spec = build_spec(&[
        (
            "login.fabula",
            &[
                "Feature: Login",
                "UI Element: Profile",
                "  - value comes from a query",
                "UI Element: Username",
                "  - id is \"#user\"",
            ][..],
        ),
        (
            "data.fabula",
            &["Table: Users", "  | name |"][..],
        ),
    ]);

    // Recognition runs outside this crate; stamp its result by hand.
    {
        let documents = spec.documents_mut();
        let feature = documents[0].feature.as_mut().unwrap();
        let property = &mut feature.ui_elements[0].items[0];
        property.property = Some("query".into());
        property.value =
            Some("SELECT name FROM [Users] WHERE name = {Username} AND x = [nope]".into());
    }

    let diagnostics = semantic_analysis::analyse(&mut spec);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message.as_str(),
        "query references an unknown name: [nope]"
    );
    assert_eq!(
        diagnostics[0].path.as_ref().map(|p| p.as_str()),
        Some("login.fabula")
    );
}

#[test]
fn stop_on_first_error_is_honoured_end_to_end() {
    let mut lexer = Lexer::new(Box::new(BundledDictionaries), "en").unwrap();
    let mut parser = Parser::new();
    parser.stop_on_first_error(true);

    let document = process_document(
        &mut lexer,
        &mut parser,
        FileInfo::new("early.fabula"),
        ["Scenario: Too early", "Feature: Never reached"],
    );
    assert_eq!(document.file_errors.len(), 1);
    assert!(document.feature.is_none());
}
