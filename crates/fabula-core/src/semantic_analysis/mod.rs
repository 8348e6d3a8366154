// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cross-document semantic analysis.
//!
//! Runs after every document of a [`Specification`] has been parsed.
//! Four passes, in order:
//! - import cycle detection (via `import_cycles`)
//! - duplicate name detection (via `duplicate_names`)
//! - orphan variant resolution (via `variant_resolution`)
//! - query reference checking (via `query_references`)
//!
//! Each pass returns its diagnostics; [`analyse`] also attaches every
//! diagnostic to the implicated document, so both the flat list and the
//! per-document lists agree.

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::specification::Specification;

pub mod duplicate_names;
pub mod import_cycles;
pub mod query_references;
pub mod variant_resolution;

/// Runs every semantic pass over the specification.
///
/// Ordering matters: variant resolution moves AST nodes between
/// documents, so name and reference checks that should see the original
/// declarations run before it, and query checking (which reads the
/// features wherever they ended up) runs last.
pub fn analyse(spec: &mut Specification) -> Vec<Diagnostic> {
    debug!(documents = spec.documents().len(), "semantic analysis");
    let mut diagnostics = Vec::new();

    let found = import_cycles::detect_import_cycles(spec);
    debug!(pass = "import_cycles", count = found.len());
    diagnostics.extend(found);

    let found = duplicate_names::check_duplicate_names(spec);
    debug!(pass = "duplicate_names", count = found.len());
    diagnostics.extend(found);

    let found = variant_resolution::resolve_orphan_variants(spec);
    debug!(pass = "variant_resolution", count = found.len());
    diagnostics.extend(found);

    let found = query_references::check_query_references(spec);
    debug!(pass = "query_references", count = found.len());
    diagnostics.extend(found);

    diagnostics
}

/// Attaches computed diagnostics to their documents and returns the
/// flat list. `found` pairs each diagnostic with its document index.
pub(crate) fn attach(
    spec: &mut Specification,
    found: Vec<(usize, Diagnostic)>,
) -> Vec<Diagnostic> {
    let mut out = Vec::with_capacity(found.len());
    for (index, diagnostic) in found {
        if let Some(document) = spec.documents_mut().get_mut(index) {
            document.add_diagnostic(diagnostic.clone());
        }
        out.push(diagnostic);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::test_support::spec_from;
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn clean_specification_has_no_diagnostics() {
        let mut spec = spec_from(&[
            (
                "login.fabula",
                &[
                    "Feature: Login",
                    "Scenario: Success",
                    "  Given that I am on the login page",
                ][..],
            ),
            (
                "users.fabula",
                &["import \"login.fabula\"", "Feature: Users"][..],
            ),
        ]);
        let diagnostics = analyse(&mut spec);
        assert!(diagnostics.is_empty(), "got {diagnostics:?}");
    }

    #[test]
    fn diagnostics_are_mirrored_onto_documents() {
        let mut spec = spec_from(&[
            ("a.fabula", &["import \"b.fabula\"", "Feature: A"][..]),
            ("b.fabula", &["import \"a.fabula\"", "Feature: B"][..]),
        ]);
        let diagnostics = analyse(&mut spec);
        let errors: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert!(!errors.is_empty());
        let attached: usize = spec
            .documents()
            .iter()
            .map(|d| d.file_errors.len())
            .sum();
        assert_eq!(attached, errors.len());
    }
}
