// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Orphan variant resolution.
//!
//! A document may declare variants without declaring a feature; they
//! extend a feature declared elsewhere. Which one depends on the
//! document's imports:
//! - no imports: nothing to extend, one error per variant
//! - one import: every variant moves into that import's feature
//! - several imports: each variant carries a `@feature(...)` tag naming
//!   the target, matched case-insensitively among the imported
//!   documents' features
//!
//! Moved variants get [`declared_in`](crate::ast::Variant::declared_in)
//! stamped with the declaring document's path, so later stages can
//! still point at the right file.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use ecow::EcoString;

use crate::ast::Variant;
use crate::diagnostics::Diagnostic;
use crate::lexing::Location;
use crate::specification::Specification;

use super::attach;

/// Moves every orphan variant into its target feature, or reports why
/// it cannot move.
pub fn resolve_orphan_variants(spec: &mut Specification) -> Vec<Diagnostic> {
    let mut found: Vec<(usize, Diagnostic)> = Vec::new();
    let doc_count = spec.documents().len();

    for index in 0..doc_count {
        let (has_feature, path, imports, variants_info) = snapshot(spec, index);
        if variants_info.is_empty() || has_feature {
            continue;
        }

        match imports.as_slice() {
            [] => {
                for info in &variants_info {
                    found.push((
                        index,
                        Diagnostic::semantic_error(
                            format!(
                                "variant \"{}\" has no feature: the document declares none and imports nothing",
                                info.name
                            ),
                            info.location,
                        )
                        .with_path(path.clone()),
                    ));
                }
            }
            [(target, value)] => {
                resolve_single_import(
                    spec,
                    index,
                    &path,
                    target,
                    value,
                    &variants_info,
                    &mut found,
                );
            }
            _ => {
                resolve_by_feature_tag(spec, index, &path, &imports, &variants_info, &mut found);
            }
        }
    }

    attach(spec, found)
}

struct VariantInfo {
    name: EcoString,
    location: Location,
    feature_tag: Option<EcoString>,
}

fn snapshot(
    spec: &mut Specification,
    index: usize,
) -> (bool, Utf8PathBuf, Vec<(Utf8PathBuf, EcoString)>, Vec<VariantInfo>) {
    let document = &spec.documents()[index];
    let imports: Vec<(Utf8PathBuf, EcoString)> = document
        .import_paths()
        .zip(&document.imports)
        .map(|(target, import)| (target, import.value.clone()))
        .collect();
    let variants_info: Vec<VariantInfo> = document
        .variants
        .iter()
        .map(|variant| VariantInfo {
            name: variant.name.clone(),
            location: variant.location,
            feature_tag: variant
                .feature_tag()
                .and_then(|tag| tag.content.clone()),
        })
        .collect();
    (
        document.feature.is_some(),
        document.path().to_path_buf(),
        imports,
        variants_info,
    )
}

fn resolve_single_import(
    spec: &mut Specification,
    index: usize,
    path: &Utf8PathBuf,
    target: &Utf8PathBuf,
    value: &EcoString,
    variants_info: &[VariantInfo],
    found: &mut Vec<(usize, Diagnostic)>,
) {
    let target_index = spec.document_index_by_path(target, false);
    let target_with_feature = target_index
        .filter(|candidate| spec.documents()[*candidate].feature.is_some());

    let Some(target_index) = target_with_feature else {
        let reason = if target_index.is_some() {
            format!("\"{value}\" declares no feature")
        } else {
            format!("\"{value}\" is not part of the specification")
        };
        for info in variants_info {
            found.push((
                index,
                Diagnostic::semantic_error(
                    format!("variant \"{}\" cannot be attached: {reason}", info.name),
                    info.location,
                )
                .with_path(path.clone()),
            ));
        }
        return;
    };

    let mut variants = std::mem::take(&mut spec.documents_mut()[index].variants);
    for variant in &mut variants {
        variant.declared_in = Some(path.clone());
    }
    if let Some(feature) = spec.documents_mut()[target_index].feature.as_mut() {
        feature.variants.extend(variants);
    }
}

fn resolve_by_feature_tag(
    spec: &mut Specification,
    index: usize,
    path: &Utf8PathBuf,
    imports: &[(Utf8PathBuf, EcoString)],
    variants_info: &[VariantInfo],
    found: &mut Vec<(usize, Diagnostic)>,
) {
    // Features reachable through this document's imports, by folded name.
    let mut candidates: HashMap<String, usize> = HashMap::new();
    for (target, _) in imports {
        let Some(target_index) = spec.document_index_by_path(target, false) else {
            continue;
        };
        if let Some(feature) = &spec.documents()[target_index].feature {
            candidates
                .entry(feature.name.as_str().to_lowercase())
                .or_insert(target_index);
        }
    }

    let decisions: Vec<Option<usize>> = variants_info
        .iter()
        .map(|info| {
            let Some(tag_content) = &info.feature_tag else {
                found.push((
                    index,
                    Diagnostic::semantic_error(
                        format!(
                            "variant \"{}\" needs a @feature(...) tag to choose among multiple imports",
                            info.name
                        ),
                        info.location,
                    )
                    .with_path(path.clone()),
                ));
                return None;
            };
            match candidates.get(&tag_content.as_str().to_lowercase()) {
                Some(target_index) => Some(*target_index),
                None => {
                    found.push((
                        index,
                        Diagnostic::semantic_error(
                            format!(
                                "variant \"{}\" references unknown feature \"{tag_content}\" among the imported documents",
                                info.name
                            ),
                            info.location,
                        )
                        .with_path(path.clone()),
                    ));
                    None
                }
            }
        })
        .collect();

    let variants = std::mem::take(&mut spec.documents_mut()[index].variants);
    let mut kept: Vec<Variant> = Vec::new();
    let mut moved: Vec<(usize, Variant)> = Vec::new();
    for (mut variant, decision) in variants.into_iter().zip(decisions) {
        match decision {
            Some(target_index) => {
                variant.declared_in = Some(path.clone());
                moved.push((target_index, variant));
            }
            None => kept.push(variant),
        }
    }
    spec.documents_mut()[index].variants = kept;
    for (target_index, variant) in moved {
        if let Some(feature) = spec.documents_mut()[target_index].feature.as_mut() {
            feature.variants.push(variant);
        }
    }
}
