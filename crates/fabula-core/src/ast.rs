// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree for Fabula documents.
//!
//! The parser builds one [`Document`] per source file; a
//! [`Specification`](crate::specification::Specification) owns the set.
//! Every AST node carries a [`Location`] for diagnostics.
//!
//! # Design notes
//!
//! - **Documents own their AST exclusively.** The one deliberate
//!   exception is orphan-variant resolution, which drains
//!   [`Document::variants`] into another document's feature and stamps
//!   [`Variant::declared_in`] with the source path.
//! - **Recognition slots.** Sentence recognition (an external
//!   collaborator) assigns semantic annotations to already-parsed
//!   content. The AST reserves `Option` fields for it
//!   ([`UiProperty::property`], [`UiProperty::value`],
//!   [`DatabaseProperty::property`], [`State`] entries) that the parser
//!   itself never fills.
//! - **Diagnostics live on the document.** Errors and warnings are kept
//!   apart so callers can gate generation on errors alone.

use camino::{Utf8Path, Utf8PathBuf};
use ecow::EcoString;

use crate::diagnostics::Diagnostic;
use crate::lexing::{Location, StepKind, TestEventKind};

/// A tag attached to a declaration: `@fast`, `@feature(Login)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: EcoString,
    /// Parenthesised content, if any: `Login` in `@feature(Login)`.
    pub content: Option<EcoString>,
    pub location: Location,
}

impl Tag {
    /// Case-insensitive name test: `is_named("global")` matches `@Global`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One step sentence. `content` is the whole line, keyword included,
/// because sentence recognition re-reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub content: EcoString,
    pub location: Location,
}

/// The `#language:` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDecl {
    pub value: EcoString,
    pub location: Location,
}

/// One `import "path"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// The quoted path, exactly as written.
    pub value: EcoString,
    pub location: Location,
}

/// A named system state, produced by sentence recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub name: EcoString,
    pub location: Location,
}

/// One `- "name" is value` entry of a `Constants:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: EcoString,
    pub value: EcoString,
    pub location: Location,
}

/// A `Constants:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantBlock {
    pub location: Location,
    pub constants: Vec<Constant>,
}

/// One `- "name" is "pattern"` entry of a `Regular Expressions:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexEntry {
    pub name: EcoString,
    pub value: EcoString,
    pub location: Location,
}

/// A `Regular Expressions:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexBlock {
    pub location: Location,
    pub entries: Vec<RegexEntry>,
}

/// One `| a | b |` row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<EcoString>,
    pub location: Location,
}

/// A named `Table:` declaration with its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: EcoString,
    pub location: Location,
    pub rows: Vec<TableRow>,
}

/// One property line of a UI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiProperty {
    /// The list item content as written.
    pub content: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    /// Sentences of an attached `Otherwise` clause.
    pub otherwise_sentences: Vec<Step>,
    /// Recognition slot: which property this line sets (`id`, `query`, ...).
    pub property: Option<EcoString>,
    /// Recognition slot: the property's value.
    pub value: Option<EcoString>,
}

impl UiProperty {
    #[must_use]
    pub fn new(content: EcoString, location: Location, tags: Vec<Tag>) -> Self {
        Self {
            content,
            location,
            tags,
            otherwise_sentences: Vec::new(),
            property: None,
            value: None,
        }
    }
}

/// A `UI Element:` declaration.
///
/// Elements declared under a feature are local to it; elements tagged
/// `@global` belong to the document and may be declared anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiElement {
    pub name: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    pub items: Vec<UiProperty>,
}

impl UiElement {
    /// True when tagged `@global`.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.tags.iter().any(|tag| tag.is_named("global"))
    }
}

/// One property line of a database declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProperty {
    /// The list item content as written.
    pub content: EcoString,
    pub location: Location,
    /// Lexed `name is value` split, when the line had that shape.
    pub name: Option<EcoString>,
    pub value: Option<EcoString>,
    /// Recognition slot: the normalised property name.
    pub property: Option<EcoString>,
}

/// A `Database:` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub name: EcoString,
    pub location: Location,
    pub properties: Vec<DatabaseProperty>,
}

/// A `Background:` block of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub location: Location,
    pub sentences: Vec<Step>,
}

/// A `Variant Background:` block, on a feature or a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantBackground {
    pub location: Location,
    pub sentences: Vec<Step>,
}

/// A `Variant:` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    pub sentences: Vec<Step>,
    /// Path of the declaring document, stamped when orphan resolution
    /// moves the variant into an imported feature.
    pub declared_in: Option<Utf8PathBuf>,
}

impl Variant {
    #[must_use]
    pub fn new(name: EcoString, location: Location, tags: Vec<Tag>) -> Self {
        Self {
            name,
            location,
            tags,
            sentences: Vec::new(),
            declared_in: None,
        }
    }

    /// The `@feature(...)` tag, used to target orphan resolution.
    #[must_use]
    pub fn feature_tag(&self) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.is_named("feature"))
    }
}

/// A `Test Case:` declaration.
///
/// Test cases are usually produced by generation tooling and imported
/// back; hand-written ones parse the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    pub sentences: Vec<Step>,
}

/// A `Scenario:` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    pub sentences: Vec<Step>,
    pub variant_background: Option<VariantBackground>,
    pub variants: Vec<Variant>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: EcoString, location: Location, tags: Vec<Tag>) -> Self {
        Self {
            name,
            location,
            tags,
            sentences: Vec::new(),
            variant_background: None,
            variants: Vec::new(),
        }
    }
}

/// A `Feature:` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: EcoString,
    pub location: Location,
    pub tags: Vec<Tag>,
    /// Free-form text lines following the declaration.
    pub description: Vec<EcoString>,
    pub background: Option<Background>,
    pub variant_background: Option<VariantBackground>,
    pub scenarios: Vec<Scenario>,
    /// Variants reattached here by cross-document orphan resolution.
    pub variants: Vec<Variant>,
    /// UI elements local to this feature.
    pub ui_elements: Vec<UiElement>,
}

impl Feature {
    #[must_use]
    pub fn new(name: EcoString, location: Location, tags: Vec<Tag>) -> Self {
        Self {
            name,
            location,
            tags,
            description: Vec::new(),
            background: None,
            variant_background: None,
            scenarios: Vec::new(),
            variants: Vec::new(),
            ui_elements: Vec::new(),
        }
    }
}

/// One `Before All:` / `After Feature:` / ... block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEventBlock {
    pub location: Location,
    pub sentences: Vec<Step>,
}

/// The six test hook blocks a document may declare, one slot each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEvents {
    pub before_all: Option<TestEventBlock>,
    pub after_all: Option<TestEventBlock>,
    pub before_feature: Option<TestEventBlock>,
    pub after_feature: Option<TestEventBlock>,
    pub before_each_scenario: Option<TestEventBlock>,
    pub after_each_scenario: Option<TestEventBlock>,
}

impl TestEvents {
    /// The slot for one event kind.
    pub fn slot_mut(&mut self, kind: TestEventKind) -> &mut Option<TestEventBlock> {
        match kind {
            TestEventKind::BeforeAll => &mut self.before_all,
            TestEventKind::AfterAll => &mut self.after_all,
            TestEventKind::BeforeFeature => &mut self.before_feature,
            TestEventKind::AfterFeature => &mut self.after_feature,
            TestEventKind::BeforeEachScenario => &mut self.before_each_scenario,
            TestEventKind::AfterEachScenario => &mut self.after_each_scenario,
        }
    }
}

/// Identity of the source file behind a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// Path as given by the caller; also the key for import resolution.
    pub path: Utf8PathBuf,
    /// Content hash, when the caller computed one (change detection).
    pub hash: Option<EcoString>,
}

impl FileInfo {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            hash: None,
        }
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<EcoString>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// The AST of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub file_info: FileInfo,
    pub language: Option<LanguageDecl>,
    pub imports: Vec<ImportDecl>,
    pub feature: Option<Feature>,
    /// Variants declared without any local feature. Orphans until
    /// cross-document resolution moves them; an error afterwards.
    pub variants: Vec<Variant>,
    /// States referenced by sentences, filled by recognition.
    pub states: Vec<State>,
    pub constant_block: Option<ConstantBlock>,
    pub regex_block: Option<RegexBlock>,
    pub tables: Vec<Table>,
    pub databases: Vec<Database>,
    /// Document-level UI elements, shared across features: the
    /// `@global`-tagged ones.
    pub ui_elements: Vec<UiElement>,
    pub test_cases: Vec<TestCase>,
    pub events: TestEvents,
    pub file_errors: Vec<Diagnostic>,
    pub file_warnings: Vec<Diagnostic>,
}

impl Document {
    #[must_use]
    pub fn new(file_info: FileInfo) -> Self {
        Self {
            file_info,
            ..Self::default()
        }
    }

    /// The source path of this document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.file_info.path
    }

    /// Files this document imports, resolved against its directory.
    pub fn import_paths(&self) -> impl Iterator<Item = Utf8PathBuf> + '_ {
        let dir = self
            .path()
            .parent()
            .map_or_else(Utf8PathBuf::new, Utf8Path::to_path_buf);
        self.imports.iter().map(move |import| {
            let mut path = dir.clone();
            path.push(import.value.as_str());
            path
        })
    }

    /// Routes a diagnostic into `file_errors` or `file_warnings`.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.file_errors.push(diagnostic);
        } else {
            self.file_warnings.push(diagnostic);
        }
    }

    /// Extends both diagnostic lists at once.
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    /// True when any error has been recorded against this document.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.file_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new(1, 1)
    }

    #[test]
    fn global_tag_is_case_insensitive() {
        let element = UiElement {
            name: "Search".into(),
            location: loc(),
            tags: vec![Tag {
                name: "Global".into(),
                content: None,
                location: loc(),
            }],
            items: Vec::new(),
        };
        assert!(element.is_global());
    }

    #[test]
    fn diagnostics_route_by_severity() {
        let mut doc = Document::new(FileInfo::new("a.fabula"));
        doc.add_diagnostic(Diagnostic::syntactic_error("boom", loc()));
        doc.add_diagnostic(Diagnostic::lexical_warning("meh", loc()));
        assert_eq!(doc.file_errors.len(), 1);
        assert_eq!(doc.file_warnings.len(), 1);
        assert!(doc.has_errors());
    }

    #[test]
    fn import_paths_resolve_against_document_directory() {
        let mut doc = Document::new(FileInfo::new("features/auth/login.fabula"));
        doc.imports.push(ImportDecl {
            value: "../users.fabula".into(),
            location: loc(),
        });
        let paths: Vec<_> = doc.import_paths().collect();
        assert_eq!(paths, vec![Utf8PathBuf::from("features/auth/../users.fabula")]);
    }

    #[test]
    fn test_events_slots_cover_all_kinds() {
        let mut events = TestEvents::default();
        *events.slot_mut(TestEventKind::BeforeAll) = Some(TestEventBlock {
            location: loc(),
            sentences: Vec::new(),
        });
        assert!(events.before_all.is_some());
        assert!(events.after_all.is_none());
    }

    #[test]
    fn variant_feature_tag_lookup() {
        let variant = Variant::new(
            "V1".into(),
            loc(),
            vec![Tag {
                name: "feature".into(),
                content: Some("Login".into()),
                location: loc(),
            }],
        );
        let tag = variant.feature_tag().unwrap();
        assert_eq!(tag.content.as_deref(), Some("Login"));
    }
}
