// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fabula compiler core.
//!
//! This crate contains the document-processing pipeline:
//! - Lexical analysis (line-oriented, keyword dictionaries per language)
//! - Parsing (single pass, context-sensitive, recovering)
//! - Specification-wide semantic analysis (imports, names, variants,
//!   query references)
//!
//! File I/O and natural-language sentence recognition stay with the
//! caller: the crate takes lines in and hands documents back.

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod diagnostics;
pub mod language;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod semantic_analysis;
pub mod specification;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Document, FileInfo};
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::language::{BundledDictionaries, DictionaryLoader, KeywordDictionary};
    pub use crate::lexing::{Lexer, Location, Node, NodeType};
    pub use crate::parsing::Parser;
    pub use crate::pipeline::process_document;
    pub use crate::specification::Specification;
}
