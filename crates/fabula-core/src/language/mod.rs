// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Keyword dictionaries for multilingual lexing.
//!
//! Fabula documents declare their natural language with a `#language:`
//! directive, and every keyword the lexer recognises comes from a
//! [`KeywordDictionary`] for that language. Dictionaries are plain data:
//! one word list per [`KeywordRole`], deserialisable from JSON so new
//! languages can be added without code changes.
//!
//! The lexer obtains dictionaries through a [`DictionaryLoader`].
//! [`BundledDictionaries`] ships English (`en`) and Portuguese (`pt`);
//! embedders with their own dictionary files implement the trait
//! themselves, typically on top of [`KeywordDictionary::from_json`].

mod builtins;

use ecow::EcoString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The language assumed before any `#language:` directive is seen.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The syntactic role a keyword plays.
///
/// Each role maps to one word list in a [`KeywordDictionary`]. The
/// `Is`, `With` and `State` roles are not line-starting keywords; they
/// support value splitting and downstream sentence recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordRole {
    Language,
    Import,
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
    RegexBlock,
    Table,
    UiElement,
    Database,
    BeforeAll,
    AfterAll,
    BeforeFeature,
    AfterFeature,
    BeforeEachScenario,
    AfterEachScenario,
    Is,
    With,
    State,
}

/// Keyword spellings for one natural language.
///
/// Field order mirrors the order constructs tend to appear in a
/// document. Every field defaults to empty, so partial dictionaries
/// deserialise cleanly; the lexer only replaces word lists that are
/// non-empty in the incoming dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordDictionary {
    pub language: Vec<EcoString>,
    pub import: Vec<EcoString>,
    pub feature: Vec<EcoString>,
    pub background: Vec<EcoString>,
    pub variant_background: Vec<EcoString>,
    pub scenario: Vec<EcoString>,
    pub variant: Vec<EcoString>,
    pub test_case: Vec<EcoString>,
    pub step_given: Vec<EcoString>,
    pub step_when: Vec<EcoString>,
    pub step_then: Vec<EcoString>,
    pub step_and: Vec<EcoString>,
    pub step_otherwise: Vec<EcoString>,
    pub constant_block: Vec<EcoString>,
    pub regex_block: Vec<EcoString>,
    pub table: Vec<EcoString>,
    pub ui_element: Vec<EcoString>,
    pub database: Vec<EcoString>,
    pub before_all: Vec<EcoString>,
    pub after_all: Vec<EcoString>,
    pub before_feature: Vec<EcoString>,
    pub after_feature: Vec<EcoString>,
    pub before_each_scenario: Vec<EcoString>,
    pub after_each_scenario: Vec<EcoString>,
    pub is: Vec<EcoString>,
    pub with: Vec<EcoString>,
    pub state: Vec<EcoString>,
}

impl KeywordDictionary {
    /// Deserialises a dictionary from its JSON representation.
    ///
    /// Keys are camelCase role names (`"testCase"`, `"uiElement"`);
    /// missing roles deserialise as empty word lists.
    pub fn from_json(language: &str, json: &str) -> Result<Self, DictionaryError> {
        serde_json::from_str(json).map_err(|e| DictionaryError::Malformed {
            language: language.into(),
            details: e.to_string().into(),
        })
    }

    /// Returns the word list for a role.
    #[must_use]
    pub fn words(&self, role: KeywordRole) -> &[EcoString] {
        match role {
            KeywordRole::Language => &self.language,
            KeywordRole::Import => &self.import,
            KeywordRole::Feature => &self.feature,
            KeywordRole::Background => &self.background,
            KeywordRole::VariantBackground => &self.variant_background,
            KeywordRole::Scenario => &self.scenario,
            KeywordRole::Variant => &self.variant,
            KeywordRole::TestCase => &self.test_case,
            KeywordRole::StepGiven => &self.step_given,
            KeywordRole::StepWhen => &self.step_when,
            KeywordRole::StepThen => &self.step_then,
            KeywordRole::StepAnd => &self.step_and,
            KeywordRole::StepOtherwise => &self.step_otherwise,
            KeywordRole::ConstantBlock => &self.constant_block,
            KeywordRole::RegexBlock => &self.regex_block,
            KeywordRole::Table => &self.table,
            KeywordRole::UiElement => &self.ui_element,
            KeywordRole::Database => &self.database,
            KeywordRole::BeforeAll => &self.before_all,
            KeywordRole::AfterAll => &self.after_all,
            KeywordRole::BeforeFeature => &self.before_feature,
            KeywordRole::AfterFeature => &self.after_feature,
            KeywordRole::BeforeEachScenario => &self.before_each_scenario,
            KeywordRole::AfterEachScenario => &self.after_each_scenario,
            KeywordRole::Is => &self.is,
            KeywordRole::With => &self.with,
            KeywordRole::State => &self.state,
        }
    }
}

/// An error obtaining a keyword dictionary.
///
/// Dictionary loading is the one place the pipeline surfaces a `Result`:
/// without a dictionary no keyword could ever match. A failed mid-document
/// language switch is downgraded to a lexical diagnostic by the lexer;
/// only an unloadable *default* dictionary is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DictionaryError {
    /// No dictionary is available for the requested language.
    #[error("no keyword dictionary for language `{language}`")]
    #[diagnostic(
        code(fabula::language::unknown),
        help("bundled languages are `en` and `pt`; other languages need a custom loader")
    )]
    NotFound {
        /// The language tag that failed to resolve.
        language: EcoString,
    },

    /// A dictionary was found but could not be deserialised.
    #[error("malformed keyword dictionary for `{language}`: {details}")]
    #[diagnostic(code(fabula::language::malformed))]
    Malformed {
        /// The language tag being loaded.
        language: EcoString,
        /// The underlying deserialisation failure.
        details: EcoString,
    },
}

/// Resolves language tags to keyword dictionaries.
///
/// Implementations decide where dictionaries come from; the lexer caches
/// results per language, so `load` is called at most once per tag per
/// lexer instance.
pub trait DictionaryLoader {
    /// Loads the dictionary for a language tag such as `en` or `pt-BR`.
    fn load(&self, language: &str) -> Result<KeywordDictionary, DictionaryError>;
}

/// The dictionaries compiled into this crate: English and Portuguese.
///
/// Region subtags are ignored (`pt-BR` resolves the `pt` dictionary) and
/// matching is case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDictionaries;

impl DictionaryLoader for BundledDictionaries {
    fn load(&self, language: &str) -> Result<KeywordDictionary, DictionaryError> {
        let primary = language
            .split('-')
            .next()
            .unwrap_or(language)
            .to_ascii_lowercase();
        builtins::dictionary(&primary).ok_or_else(|| DictionaryError::NotFound {
            language: language.into(),
        })
    }
}
