// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query reference checking.
//!
//! UI element properties whose recognised `property` is `query` carry a
//! query string that may reference other declarations:
//! - `[name]` references a constant, table or database, matched
//!   case-insensitively across the whole specification
//! - `{Element}` references a UI element of the feature owning the
//!   query; `{Feature:Element}` names the feature explicitly
//!   (case-sensitively), then the element case-insensitively among that
//!   feature's local elements
//!
//! Recognition itself is an external collaborator; this pass only reads
//! the annotation slots it fills in.

use std::collections::{HashMap, HashSet};

use camino::Utf8PathBuf;
use ecow::EcoString;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::lexing::Location;
use crate::specification::Specification;

use super::attach;

static NAME_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("name reference pattern"));

static ELEMENT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(?:([^{}:]*):)?([^{}:]*)\}").expect("element reference pattern"));

/// One query annotation found on a UI element property.
struct QueryRef {
    document: usize,
    /// The feature owning the element, when it is feature-local.
    owner_feature: Option<EcoString>,
    location: Location,
    text: EcoString,
}

/// Validates every `[name]` and `{Feature:Element}` reference of every
/// recognised query.
pub fn check_query_references(spec: &mut Specification) -> Vec<Diagnostic> {
    let mut found: Vec<(usize, Diagnostic)> = Vec::new();
    let paths: Vec<Utf8PathBuf> = spec
        .documents()
        .iter()
        .map(|document| document.path().to_path_buf())
        .collect();

    let mut value_names: HashSet<String> = HashSet::new();
    for item in spec.constants(true) {
        value_names.insert(item.name.as_str().to_lowercase());
    }
    for item in spec.databases(false) {
        value_names.insert(item.name.as_str().to_lowercase());
    }
    for item in spec.tables(false) {
        value_names.insert(item.name.as_str().to_lowercase());
    }

    // Feature name (exact) to its local element names (folded).
    let mut feature_elements: HashMap<EcoString, Vec<String>> = HashMap::new();
    for document in spec.documents() {
        if let Some(feature) = &document.feature {
            let elements = feature
                .ui_elements
                .iter()
                .map(|element| element.name.as_str().to_lowercase())
                .collect();
            feature_elements.entry(feature.name.clone()).or_insert(elements);
        }
    }

    for query in collect_queries(spec) {
        let path = paths
            .get(query.document)
            .cloned()
            .unwrap_or_default();
        for message in reference_errors(&query, &value_names, &feature_elements) {
            found.push((
                query.document,
                Diagnostic::semantic_error(message, query.location).with_path(path.clone()),
            ));
        }
    }

    attach(spec, found)
}

fn collect_queries(spec: &Specification) -> Vec<QueryRef> {
    let mut queries = Vec::new();
    for (index, document) in spec.documents().iter().enumerate() {
        let mut elements = Vec::new();
        for element in &document.ui_elements {
            elements.push((None, element));
        }
        if let Some(feature) = &document.feature {
            for element in &feature.ui_elements {
                elements.push((Some(feature.name.clone()), element));
            }
        }
        for (owner_feature, element) in elements {
            for item in &element.items {
                let is_query = item.property.as_deref() == Some("query");
                if !is_query {
                    continue;
                }
                let Some(text) = &item.value else {
                    continue;
                };
                queries.push(QueryRef {
                    document: index,
                    owner_feature: owner_feature.clone(),
                    location: item.location,
                    text: text.clone(),
                });
            }
        }
    }
    queries
}

fn reference_errors(
    query: &QueryRef,
    value_names: &HashSet<String>,
    feature_elements: &HashMap<EcoString, Vec<String>>,
) -> Vec<String> {
    let mut errors = Vec::new();
    let text = query.text.as_str();

    for capture in NAME_REFERENCE.captures_iter(text) {
        let Some(name) = capture.get(1).map(|group| group.as_str()) else {
            continue;
        };
        if !value_names.contains(&name.to_lowercase()) {
            errors.push(format!("query references an unknown name: [{name}]"));
        }
    }

    for capture in ELEMENT_REFERENCE.captures_iter(text) {
        let feature_part = capture.get(1).map(|group| group.as_str());
        let element_part = capture.get(2).map_or("", |group| group.as_str());
        if element_part.trim().is_empty() {
            errors.push("query references an empty UI element name".to_string());
            continue;
        }
        match feature_part {
            Some(feature_name) if feature_name.trim().is_empty() => {
                errors.push("query references an empty feature name".to_string());
            }
            Some(feature_name) => {
                if let Some(message) =
                    element_error(feature_elements, feature_name, element_part)
                {
                    errors.push(message);
                }
            }
            None => match &query.owner_feature {
                Some(owner) => {
                    if let Some(message) = element_error(feature_elements, owner, element_part) {
                        errors.push(message);
                    }
                }
                None => {
                    errors.push(format!(
                        "query references UI element \"{element_part}\" outside any feature"
                    ));
                }
            },
        }
    }

    errors
}

fn element_error(
    feature_elements: &HashMap<EcoString, Vec<String>>,
    feature_name: &str,
    element: &str,
) -> Option<String> {
    let Some(elements) = feature_elements.get(feature_name) else {
        return Some(format!("query references unknown feature \"{feature_name}\""));
    };
    if elements.is_empty() {
        return Some(format!("feature \"{feature_name}\" declares no UI elements"));
    }
    if !elements.contains(&element.to_lowercase()) {
        return Some(format!(
            "query references unknown UI element \"{element}\" of feature \"{feature_name}\""
        ));
    }
    None
}
