// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! A specification: every parsed document of one project.
//!
//! The [`Specification`] owns its [`Document`]s and offers indexed
//! views over them (by path, by feature name, item listings). Views are
//! computed lazily and cached; each accessor takes a `clear_cache` flag
//! that rebuilds the caches first, for callers that just mutated the
//! documents. [`documents_mut`](Specification::documents_mut) drops all
//! caches unconditionally.
//!
//! Paths are compared after lexical normalisation against the base
//! directory, so `features/auth/../users.fabula` and
//! `features/users.fabula` name the same document. No filesystem access
//! happens here.

use std::collections::HashMap;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use ecow::EcoString;

use crate::ast::{Document, Feature};
use crate::lexing::Location;

/// A named item and the document that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub name: EcoString,
    pub location: Location,
    /// Index of the declaring document.
    pub document: usize,
}

/// All documents of a project, with lazy lookup caches.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    base_path: Utf8PathBuf,
    documents: Vec<Document>,
    path_index: Option<HashMap<Utf8PathBuf, usize>>,
    feature_index: Option<HashMap<EcoString, usize>>,
    feature_refs: Option<Vec<ItemRef>>,
    constant_refs: Option<Vec<ItemRef>>,
    table_refs: Option<Vec<ItemRef>>,
    database_refs: Option<Vec<ItemRef>>,
}

impl Specification {
    #[must_use]
    pub fn new(base_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Utf8Path {
        &self.base_path
    }

    /// Adds a document and returns its index.
    pub fn add_document(&mut self, document: Document) -> usize {
        self.clear_caches();
        self.documents.push(document);
        self.documents.len() - 1
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Mutable access to the documents. Drops every cache, since the
    /// caller may rename or remove anything.
    pub fn documents_mut(&mut self) -> &mut Vec<Document> {
        self.clear_caches();
        &mut self.documents
    }

    fn clear_caches(&mut self) {
        self.path_index = None;
        self.feature_index = None;
        self.feature_refs = None;
        self.constant_refs = None;
        self.table_refs = None;
        self.database_refs = None;
    }

    /// The normalised lookup key for a path.
    fn key_for(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            normalise_path(path)
        } else {
            normalise_path(&self.base_path.join(path))
        }
    }

    /// Finds the document with the given path, by normalised comparison.
    pub fn document_index_by_path(
        &mut self,
        path: &Utf8Path,
        clear_cache: bool,
    ) -> Option<usize> {
        if clear_cache {
            self.clear_caches();
        }
        let key = self.key_for(path);
        if self.path_index.is_none() {
            let mut index = HashMap::new();
            for (i, document) in self.documents.iter().enumerate() {
                let doc_key = if document.path().is_absolute() {
                    normalise_path(document.path())
                } else {
                    normalise_path(&self.base_path.join(document.path()))
                };
                index.entry(doc_key).or_insert(i);
            }
            self.path_index = Some(index);
        }
        self.path_index.as_ref()?.get(&key).copied()
    }

    pub fn document_by_path(&mut self, path: &Utf8Path, clear_cache: bool) -> Option<&Document> {
        let index = self.document_index_by_path(path, clear_cache)?;
        self.documents.get(index)
    }

    /// Finds a feature by exact name. Feature names are the one
    /// case-sensitive namespace; everything else in the language
    /// compares case-insensitively.
    pub fn feature_by_name(&mut self, name: &str, clear_cache: bool) -> Option<&Feature> {
        if clear_cache {
            self.clear_caches();
        }
        if self.feature_index.is_none() {
            let mut index = HashMap::new();
            for (i, document) in self.documents.iter().enumerate() {
                if let Some(feature) = &document.feature {
                    index.entry(feature.name.clone()).or_insert(i);
                }
            }
            self.feature_index = Some(index);
        }
        let index = *self.feature_index.as_ref()?.get(name)?;
        self.documents.get(index)?.feature.as_ref()
    }

    /// Every feature, in document order.
    pub fn features(&mut self, clear_cache: bool) -> &[ItemRef] {
        if clear_cache {
            self.clear_caches();
        }
        let documents = &self.documents;
        self.feature_refs.get_or_insert_with(|| {
            documents
                .iter()
                .enumerate()
                .filter_map(|(i, document)| {
                    document.feature.as_ref().map(|feature| ItemRef {
                        name: feature.name.clone(),
                        location: feature.location,
                        document: i,
                    })
                })
                .collect()
        })
    }

    /// Every constant declared by any document.
    pub fn constants(&mut self, clear_cache: bool) -> &[ItemRef] {
        if clear_cache {
            self.clear_caches();
        }
        let documents = &self.documents;
        self.constant_refs.get_or_insert_with(|| {
            documents
                .iter()
                .enumerate()
                .flat_map(|(i, document)| {
                    document
                        .constant_block
                        .iter()
                        .flat_map(|block| &block.constants)
                        .map(move |constant| ItemRef {
                            name: constant.name.clone(),
                            location: constant.location,
                            document: i,
                        })
                })
                .collect()
        })
    }

    /// Every named table declared by any document.
    pub fn tables(&mut self, clear_cache: bool) -> &[ItemRef] {
        if clear_cache {
            self.clear_caches();
        }
        let documents = &self.documents;
        self.table_refs.get_or_insert_with(|| {
            documents
                .iter()
                .enumerate()
                .flat_map(|(i, document)| {
                    document.tables.iter().map(move |table| ItemRef {
                        name: table.name.clone(),
                        location: table.location,
                        document: i,
                    })
                })
                .collect()
        })
    }

    /// Every database declared by any document.
    pub fn databases(&mut self, clear_cache: bool) -> &[ItemRef] {
        if clear_cache {
            self.clear_caches();
        }
        let documents = &self.documents;
        self.database_refs.get_or_insert_with(|| {
            documents
                .iter()
                .enumerate()
                .flat_map(|(i, document)| {
                    document.databases.iter().map(move |database| ItemRef {
                        name: database.name.clone(),
                        location: database.location,
                        document: i,
                    })
                })
                .collect()
        })
    }
}

/// Removes `.` segments and resolves `..` against preceding normal
/// segments, without touching the filesystem.
fn normalise_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut out: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.last() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                Some(Utf8Component::RootDir) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    out.iter().map(|component| component.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, ConstantBlock, FileInfo};

    fn loc() -> Location {
        Location::new(1, 1)
    }

    fn doc_with_feature(path: &str, feature: &str) -> Document {
        let mut document = Document::new(FileInfo::new(path));
        document.feature = Some(Feature::new(feature.into(), loc(), Vec::new()));
        document
    }

    #[test]
    fn path_lookup_normalises_dot_segments() {
        let mut spec = Specification::new("project");
        spec.add_document(doc_with_feature("features/users.fabula", "Users"));

        let found = spec.document_by_path(Utf8Path::new("features/auth/../users.fabula"), false);
        assert!(found.is_some());
        assert_eq!(found.unwrap().feature.as_ref().unwrap().name, "Users");
    }

    #[test]
    fn feature_lookup_is_case_sensitive() {
        let mut spec = Specification::new("");
        spec.add_document(doc_with_feature("a.fabula", "Login"));

        assert!(spec.feature_by_name("Login", false).is_some());
        assert!(spec.feature_by_name("login", false).is_none());
    }

    #[test]
    fn caches_refresh_on_clear() {
        let mut spec = Specification::new("");
        spec.add_document(doc_with_feature("a.fabula", "First"));
        assert_eq!(spec.features(false).len(), 1);

        // Mutate behind the cache, then ask for a rebuild.
        spec.documents_mut()
            .push(doc_with_feature("b.fabula", "Second"));
        assert_eq!(spec.features(false).len(), 2);
        spec.add_document(doc_with_feature("c.fabula", "Third"));
        assert_eq!(spec.features(true).len(), 3);
    }

    #[test]
    fn constants_view_spans_documents() {
        let mut spec = Specification::new("");
        let mut a = Document::new(FileInfo::new("a.fabula"));
        a.constant_block = Some(ConstantBlock {
            location: loc(),
            constants: vec![Constant {
                name: "pi".into(),
                value: "3.14".into(),
                location: loc(),
            }],
        });
        let mut b = Document::new(FileInfo::new("b.fabula"));
        b.constant_block = Some(ConstantBlock {
            location: loc(),
            constants: vec![Constant {
                name: "e".into(),
                value: "2.72".into(),
                location: loc(),
            }],
        });
        spec.add_document(a);
        spec.add_document(b);

        let names: Vec<_> = spec.constants(false).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["pi", "e"]);
        assert_eq!(spec.constants(false)[1].document, 1);
    }

    #[test]
    fn normalisation_keeps_leading_parents() {
        assert_eq!(
            normalise_path(Utf8Path::new("../shared/x.fabula")),
            Utf8PathBuf::from("../shared/x.fabula")
        );
        assert_eq!(
            normalise_path(Utf8Path::new("a/./b/../c.fabula")),
            Utf8PathBuf::from("a/c.fabula")
        );
    }
}
