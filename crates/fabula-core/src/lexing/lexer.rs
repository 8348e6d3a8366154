// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! The line-oriented lexer.
//!
//! Callers feed lines one at a time with [`Lexer::add_line`]; the lexer
//! accumulates [`Node`]s and diagnostics until [`Lexer::reset`]. One
//! lexer instance processes many documents: loaded keyword dictionaries
//! are cached across resets.
//!
//! # Dispatch
//!
//! Matchers are tried in priority order. As an optimisation, the matcher
//! that claimed the previous line suggests which matchers to try first
//! on the next one (a scenario line is usually followed by steps, a
//! table by rows). The suggestion list never contains the `Text`
//! catch-all, and a miss falls back to the full list, so suggestions
//! cannot change what a line lexes as, only how fast.

use std::collections::HashMap;

use ecow::EcoString;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::language::{DictionaryError, DictionaryLoader, KeywordDictionary};

use super::matchers::{LineMatch, Matcher};
use super::{Location, Node, NodePayload, NodeType};

/// A lexer for Fabula documents.
///
/// Construction requires loading the default language's dictionary;
/// that is the only fallible step. From then on every problem becomes a
/// diagnostic: a failed `#language:` switch is reported and the current
/// language stays active.
pub struct Lexer {
    /// Priority-ordered matchers; the `Text` catch-all is last.
    matchers: Vec<Matcher>,
    /// Matcher index by the node type it produces, for suggestions.
    by_type: HashMap<NodeType, usize>,
    /// Index of the `#language:` matcher, tried on every `#` line.
    language_index: usize,
    nodes: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
    default_language: EcoString,
    language: EcoString,
    /// Dictionaries already loaded by this instance. Survives `reset`.
    dictionaries: HashMap<EcoString, KeywordDictionary>,
    loader: Box<dyn DictionaryLoader>,
    /// The matcher that claimed the previous line.
    last_matched: Option<usize>,
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("language", &self.language)
            .field("nodes", &self.nodes.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

impl Lexer {
    /// Creates a lexer whose `default_language` dictionary comes from
    /// `loader`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the default dictionary cannot be
    /// obtained; without it no keyword could ever match.
    pub fn new(
        loader: Box<dyn DictionaryLoader>,
        default_language: impl Into<EcoString>,
    ) -> Result<Self, DictionaryError> {
        let default_language = default_language.into();
        let dictionary = loader.load(&default_language)?;
        let mut lexer = Self {
            matchers: Vec::new(),
            by_type: HashMap::new(),
            language_index: 0,
            nodes: Vec::new(),
            diagnostics: Vec::new(),
            default_language: default_language.clone(),
            language: default_language.clone(),
            dictionaries: HashMap::from([(default_language, dictionary.clone())]),
            loader,
            last_matched: None,
        };
        lexer.install(&dictionary);
        Ok(lexer)
    }

    /// Rebuilds the matcher list from a dictionary.
    fn install(&mut self, dictionary: &KeywordDictionary) {
        self.matchers = Matcher::all(dictionary);
        self.by_type = self
            .matchers
            .iter()
            .enumerate()
            .map(|(index, matcher)| (matcher.node_type(), index))
            .collect();
        self.language_index = self
            .matchers
            .iter()
            .position(Matcher::is_language)
            .unwrap_or(0);
    }

    /// Lexes one line.
    ///
    /// Returns `true` when the line contributed nodes or diagnostics.
    /// Blank lines and full-line comments contribute nothing and return
    /// `false`.
    pub fn add_line(&mut self, line: &str, line_number: u32) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed.starts_with('#') {
            // Either the language directive or a comment line.
            if let Some(result) = self.matchers[self.language_index].try_match(line, line_number) {
                let index = self.language_index;
                return self.apply(index, result);
            }
            return false;
        }
        if let Some(last) = self.last_matched {
            for node_type in self.matchers[last].suggested_next() {
                let Some(&index) = self.by_type.get(node_type) else {
                    continue;
                };
                if self.matchers[index].is_fallback() {
                    continue;
                }
                if let Some(result) = self.matchers[index].try_match(line, line_number) {
                    return self.apply(index, result);
                }
            }
        }
        for index in 0..self.matchers.len() {
            if index == self.language_index {
                continue;
            }
            if let Some(result) = self.matchers[index].try_match(line, line_number) {
                return self.apply(index, result);
            }
        }
        // The Text matcher claims every non-blank line.
        false
    }

    fn apply(&mut self, index: usize, result: LineMatch) -> bool {
        self.last_matched = Some(index);
        let significant = !result.nodes.is_empty() || !result.diagnostics.is_empty();
        for node in &result.nodes {
            if let NodePayload::Language { value } = &node.payload {
                let value = value.clone();
                self.switch_language(&value, node.location);
            }
        }
        self.nodes.extend(result.nodes);
        self.diagnostics.extend(result.diagnostics);
        significant
    }

    /// Switches the active keyword dictionary.
    ///
    /// Only roles with non-empty word lists in the new dictionary
    /// replace the current words, so a partial dictionary falls back to
    /// the previous language for the roles it omits. A failed load is a
    /// lexical error and the active language is unchanged.
    fn switch_language(&mut self, language: &EcoString, location: Location) {
        if *language == self.language {
            return;
        }
        let cached = self.dictionaries.get(language).cloned();
        let dictionary = match cached {
            Some(dictionary) => dictionary,
            None => match self.loader.load(language) {
                Ok(dictionary) => {
                    self.dictionaries
                        .insert(language.clone(), dictionary.clone());
                    dictionary
                }
                Err(error) => {
                    debug!(%language, %error, "keyword dictionary load failed");
                    self.diagnostics
                        .push(Diagnostic::lexical_error(error.to_string(), location));
                    return;
                }
            },
        };
        debug!(%language, "switching keyword dictionary");
        for matcher in &mut self.matchers {
            if let Some(role) = matcher.role() {
                let words = dictionary.words(role);
                if !words.is_empty() {
                    matcher.set_words(words);
                }
            }
        }
        self.language = language.clone();
    }

    /// The nodes lexed so far, in input order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All diagnostics reported so far, in input order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The error diagnostics reported so far.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// The warning diagnostics reported so far.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// True when at least one error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The language currently driving keyword matching.
    #[must_use]
    pub fn language(&self) -> &EcoString {
        &self.language
    }

    /// Clears accumulated nodes and diagnostics and reverts to the
    /// default language. Loaded dictionaries stay cached.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.diagnostics.clear();
        self.last_matched = None;
        if self.language != self.default_language {
            // A partial dictionary may have left mixed word lists, so
            // reinstall the default wholesale.
            if let Some(dictionary) = self.dictionaries.get(&self.default_language).cloned() {
                self.install(&dictionary);
            }
            self.language = self.default_language.clone();
        }
    }
}
