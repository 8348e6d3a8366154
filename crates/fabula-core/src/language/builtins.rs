// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bundled keyword dictionaries.
//!
//! These are the dictionaries [`BundledDictionaries`](super::BundledDictionaries)
//! serves. Word lists put longer spellings first so that, for example,
//! `given that` wins over `given` when both could match a step line.

use ecow::EcoString;

use super::KeywordDictionary;

/// Returns the bundled dictionary for a primary language subtag.
pub(super) fn dictionary(language: &str) -> Option<KeywordDictionary> {
    match language {
        "en" => Some(english()),
        "pt" => Some(portuguese()),
        _ => None,
    }
}

fn words(list: &[&str]) -> Vec<EcoString> {
    list.iter().copied().map(EcoString::from).collect()
}

fn english() -> KeywordDictionary {
    KeywordDictionary {
        language: words(&["language"]),
        import: words(&["import"]),
        feature: words(&["feature", "user story", "story"]),
        background: words(&["background"]),
        variant_background: words(&["variant background"]),
        scenario: words(&["scenario"]),
        variant: words(&["variant"]),
        test_case: words(&["test case"]),
        step_given: words(&["given that", "given"]),
        step_when: words(&["when"]),
        step_then: words(&["then"]),
        step_and: words(&["and", "but"]),
        step_otherwise: words(&["otherwise", "when invalid", "if invalid"]),
        constant_block: words(&["constants"]),
        regex_block: words(&["regular expressions", "regexes"]),
        table: words(&["table"]),
        ui_element: words(&["user interface element", "ui element"]),
        database: words(&["database"]),
        before_all: words(&["before all"]),
        after_all: words(&["after all"]),
        before_feature: words(&["before feature"]),
        after_feature: words(&["after feature"]),
        before_each_scenario: words(&["before each scenario"]),
        after_each_scenario: words(&["after each scenario"]),
        is: words(&["is"]),
        with: words(&["with"]),
        state: words(&["state"]),
    }
}

fn portuguese() -> KeywordDictionary {
    KeywordDictionary {
        language: words(&["language", "linguagem", "idioma", "língua"]),
        import: words(&["importe", "importar"]),
        feature: words(&[
            "funcionalidade",
            "história de usuário",
            "história",
            "característica",
        ]),
        background: words(&["contexto", "fundo"]),
        variant_background: words(&["contexto de variante"]),
        scenario: words(&["cenário", "cenario"]),
        variant: words(&["variante"]),
        test_case: words(&["caso de teste"]),
        step_given: words(&["dado que", "dada que", "dado", "dada"]),
        step_when: words(&["quando"]),
        step_then: words(&["então", "entao"]),
        step_and: words(&["e", "mas"]),
        step_otherwise: words(&["caso contrário", "caso contrario", "senão", "senao"]),
        constant_block: words(&["constantes"]),
        regex_block: words(&["expressões regulares", "expressoes regulares"]),
        table: words(&["tabela"]),
        ui_element: words(&["elemento de interface de usuário", "elemento de iu"]),
        database: words(&["banco de dados"]),
        before_all: words(&["antes de todas", "antes de tudo"]),
        after_all: words(&["depois de todas", "depois de tudo"]),
        before_feature: words(&["antes da funcionalidade"]),
        after_feature: words(&["depois da funcionalidade"]),
        before_each_scenario: words(&["antes de cada cenário", "antes de cada cenario"]),
        after_each_scenario: words(&["depois de cada cenário", "depois de cada cenario"]),
        is: words(&["é", "eh"]),
        with: words(&["com"]),
        state: words(&["estado"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_spellings_come_first() {
        let en = english();
        let given = en.step_given;
        assert_eq!(given[0], "given that");

        let pt = portuguese();
        assert_eq!(pt.step_given[0], "dado que");
    }

    #[test]
    fn language_directive_is_recognizable_in_every_dictionary() {
        // `#language:` must keep lexing after a switch, so every
        // dictionary carries the universal spelling.
        for code in ["en", "pt"] {
            let dict = dictionary(code).unwrap();
            assert!(
                dict.language.iter().any(|w| w.as_str() == "language"),
                "{code} dictionary cannot lex `#language:`"
            );
        }
    }

    #[test]
    fn every_lexed_role_has_english_words() {
        let en = english();
        for list in [
            &en.language,
            &en.import,
            &en.feature,
            &en.background,
            &en.variant_background,
            &en.scenario,
            &en.variant,
            &en.test_case,
            &en.step_given,
            &en.step_when,
            &en.step_then,
            &en.step_and,
            &en.step_otherwise,
            &en.constant_block,
            &en.regex_block,
            &en.table,
            &en.ui_element,
            &en.database,
            &en.before_all,
            &en.after_all,
            &en.before_feature,
            &en.after_feature,
            &en.before_each_scenario,
            &en.after_each_scenario,
        ] {
            assert!(!list.is_empty());
        }
    }
}
