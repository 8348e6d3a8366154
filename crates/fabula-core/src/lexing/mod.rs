// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Fabula documents.
//!
//! Fabula is line-oriented: each source line lexes independently into
//! zero or more [`Node`]s, and indentation is free-form. The [`Lexer`]
//! accumulates nodes across [`Lexer::add_line`] calls so that callers
//! own file traversal and I/O.
//!
//! ```
//! use fabula_core::language::BundledDictionaries;
//! use fabula_core::lexing::{Lexer, NodeType};
//!
//! let mut lexer = Lexer::new(Box::new(BundledDictionaries), "en").unwrap();
//! lexer.add_line("Feature: Login", 1);
//! lexer.add_line("Scenario: Successful login", 2);
//! let types: Vec<_> = lexer.nodes().iter().map(|n| n.node_type()).collect();
//! assert_eq!(types, vec![NodeType::Feature, NodeType::Scenario]);
//! ```
//!
//! # Multilingual keywords
//!
//! Keywords come from per-language dictionaries (see [`crate::language`]).
//! A `#language:` directive mid-document rewrites the matchers' word
//! lists in place; everything already lexed stays as lexed.
//!
//! # Error handling
//!
//! The lexer never fails on input. Malformed lines become located
//! diagnostics, and the `Text` catch-all guarantees that anything not
//! recognisable as a construct still reaches the parser as content.

mod lexer;
mod location;
mod matchers;
mod node;

#[cfg(test)]
mod lexer_property_tests;

pub use lexer::Lexer;
pub use location::Location;
pub use node::{Node, NodePayload, NodeType, StepKind, TestEventKind};
