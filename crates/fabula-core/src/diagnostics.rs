// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Located diagnostics shared by every compilation stage.
//!
//! Problems found while compiling a document are never propagated as
//! `Result` failures. Each stage accumulates [`Diagnostic`] values and
//! keeps going, so a single pass over a specification reports every
//! problem it can find. Errors and warnings are kept in separate lists
//! on the owning document; [`Severity`] is what tells them apart here.

use camino::Utf8PathBuf;
use ecow::EcoString;
use std::fmt;

use crate::lexing::Location;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A problem that invalidates (part of) the document.
    Error,
    /// A problem the compiler recovered from without losing content.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticStage {
    /// Produced while splitting lines into nodes.
    Lexical,
    /// Produced while assembling nodes into a document AST.
    Syntactic,
    /// Produced while cross-checking the whole specification.
    Semantic,
}

/// A located problem report.
///
/// Diagnostics carry a [`Location`] within their document; cross-document
/// passes additionally set `path` so a flat list stays attributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The stage that reported it.
    pub stage: DiagnosticStage,
    /// The human-readable message.
    pub message: EcoString,
    /// The position within the document.
    pub location: Location,
    /// The document path, when known to the reporting stage.
    pub path: Option<Utf8PathBuf>,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        stage: DiagnosticStage,
        message: impl Into<EcoString>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            stage,
            message: message.into(),
            location,
            path: None,
        }
    }

    /// Creates an error reported by the lexer.
    #[must_use]
    pub fn lexical_error(message: impl Into<EcoString>, location: Location) -> Self {
        Self::new(Severity::Error, DiagnosticStage::Lexical, message, location)
    }

    /// Creates a warning reported by the lexer.
    #[must_use]
    pub fn lexical_warning(message: impl Into<EcoString>, location: Location) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticStage::Lexical,
            message,
            location,
        )
    }

    /// Creates an error reported by the parser.
    #[must_use]
    pub fn syntactic_error(message: impl Into<EcoString>, location: Location) -> Self {
        Self::new(
            Severity::Error,
            DiagnosticStage::Syntactic,
            message,
            location,
        )
    }

    /// Creates an error reported by the semantic analyser.
    #[must_use]
    pub fn semantic_error(message: impl Into<EcoString>, location: Location) -> Self {
        Self::new(Severity::Error, DiagnosticStage::Semantic, message, location)
    }

    /// Creates a warning reported by the semantic analyser.
    #[must_use]
    pub fn semantic_warning(message: impl Into<EcoString>, location: Location) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticStage::Semantic,
            message,
            location,
        )
    }

    /// Attaches the owning document's path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns true for [`Severity::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{path}: ")?;
        }
        write!(f, "{} {}: {}", self.severity, self.location, self.message)
    }
}
