// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! The lex and parse glue for one document.
//!
//! Reading files, recognising sentences and running the semantic passes
//! stay with the caller; this is just the per-document sequence every
//! caller needs: reset the lexer, feed the lines, parse the nodes,
//! gather the diagnostics.
//!
//! ```
//! use fabula_core::ast::FileInfo;
//! use fabula_core::language::BundledDictionaries;
//! use fabula_core::lexing::Lexer;
//! use fabula_core::parsing::Parser;
//! use fabula_core::pipeline::process_document;
//!
//! let mut lexer = Lexer::new(Box::new(BundledDictionaries), "en").unwrap();
//! let mut parser = Parser::new();
//!
//! let document = process_document(
//!     &mut lexer,
//!     &mut parser,
//!     FileInfo::new("login.fabula"),
//!     ["Feature: Login", "Scenario: Success"],
//! );
//!
//! assert!(!document.has_errors());
//! assert_eq!(document.feature.unwrap().scenarios.len(), 1);
//! ```

use tracing::debug;

use crate::ast::{Document, FileInfo};
use crate::lexing::Lexer;
use crate::parsing::Parser;

/// Lexes and parses one document's lines into a [`Document`].
///
/// The lexer is reset first, so one lexer/parser pair can process a
/// whole specification sequentially. Lexical and syntactic diagnostics
/// both end up on the returned document.
pub fn process_document<I, S>(
    lexer: &mut Lexer,
    parser: &mut Parser,
    file_info: FileInfo,
    lines: I,
) -> Document
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut document = Document::new(file_info);

    lexer.reset();
    for (index, line) in lines.into_iter().enumerate() {
        lexer.add_line(line.as_ref(), (index + 1) as u32);
    }
    document.add_diagnostics(lexer.diagnostics().iter().cloned());

    let ignored = parser.analyse(lexer.nodes(), &mut document);
    if !ignored.is_empty() {
        debug!(path = %document.path(), ignored = ?ignored, "nodes without a subparser");
    }
    document.add_diagnostics(parser.diagnostics().iter().cloned());

    debug!(
        path = %document.path(),
        nodes = lexer.nodes().len(),
        errors = document.file_errors.len(),
        warnings = document.file_warnings.len(),
        "document processed"
    );
    document
}
