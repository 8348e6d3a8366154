// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Duplicate name detection.
//!
//! One grouping routine, applied per namespace: feature, table and
//! database names must be unique across the whole specification;
//! scenario and variant names only within their document. Comparison is
//! case-insensitive. Every member of a duplicated group gets its own
//! error naming the other occurrences, so the reported locations cover
//! the duplicated subset exactly.

use std::collections::HashMap;

use camino::Utf8PathBuf;

use crate::diagnostics::Diagnostic;
use crate::specification::{ItemRef, Specification};

use super::attach;

/// Checks every name namespace of the specification.
pub fn check_duplicate_names(spec: &mut Specification) -> Vec<Diagnostic> {
    let mut found: Vec<(usize, Diagnostic)> = Vec::new();
    let paths: Vec<Utf8PathBuf> = spec
        .documents()
        .iter()
        .map(|document| document.path().to_path_buf())
        .collect();

    let features = spec.features(true).to_vec();
    let tables = spec.tables(false).to_vec();
    let databases = spec.databases(false).to_vec();
    report_duplicates("feature", &features, &paths, &mut found);
    report_duplicates("table", &tables, &paths, &mut found);
    report_duplicates("database", &databases, &paths, &mut found);

    for (index, document) in spec.documents().iter().enumerate() {
        let mut variants: Vec<ItemRef> = document
            .variants
            .iter()
            .map(|variant| ItemRef {
                name: variant.name.clone(),
                location: variant.location,
                document: index,
            })
            .collect();
        if let Some(feature) = &document.feature {
            let scenarios: Vec<ItemRef> = feature
                .scenarios
                .iter()
                .map(|scenario| ItemRef {
                    name: scenario.name.clone(),
                    location: scenario.location,
                    document: index,
                })
                .collect();
            report_duplicates("scenario", &scenarios, &paths, &mut found);

            for variant in feature
                .scenarios
                .iter()
                .flat_map(|scenario| &scenario.variants)
                .chain(&feature.variants)
            {
                variants.push(ItemRef {
                    name: variant.name.clone(),
                    location: variant.location,
                    document: index,
                });
            }
        }
        report_duplicates("variant", &variants, &paths, &mut found);
    }

    attach(spec, found)
}

/// Splits `items` into groups of equal (case-folded) name and keeps the
/// groups with more than one member, in document order.
fn duplicate_groups(items: &[ItemRef]) -> Vec<Vec<&ItemRef>> {
    let mut groups: HashMap<String, Vec<&ItemRef>> = HashMap::new();
    for item in items {
        groups.entry(item.name.as_str().to_lowercase()).or_default().push(item);
    }
    let mut duplicated: Vec<Vec<&ItemRef>> = groups
        .into_values()
        .filter(|group| group.len() > 1)
        .collect();
    duplicated.sort_by_key(|group| (group[0].document, group[0].location));
    duplicated
}

fn report_duplicates(
    kind: &str,
    items: &[ItemRef],
    paths: &[Utf8PathBuf],
    found: &mut Vec<(usize, Diagnostic)>,
) {
    for group in duplicate_groups(items) {
        for member in &group {
            let others: Vec<String> = group
                .iter()
                .filter(|other| {
                    other.document != member.document || other.location != member.location
                })
                .map(|other| {
                    let path = paths
                        .get(other.document)
                        .map_or("", |path| path.as_str());
                    format!("{path} {}", other.location)
                })
                .collect();
            let message = format!(
                "duplicated {kind} name \"{}\": also declared at {}",
                member.name,
                others.join(", ")
            );
            let path = paths.get(member.document).cloned().unwrap_or_default();
            found.push((
                member.document,
                Diagnostic::semantic_error(message, member.location).with_path(path),
            ));
        }
    }
}
