//! Snapshots of a set of mini documents and their compilation.
//!
//! A [`Project`] is immutable: editing a document produces a new project
//! with a rebuilt compilation, so an analysis can hold the old and the new
//! project side by side. Untouched documents keep their trees.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use super::parser::{SyntaxError, parse};
use super::semantic::Compilation;
use super::syntax_kind::{MiniLanguage, SyntaxNode};
use crate::analysis::DocumentSnapshot;
use crate::base::{DocumentId, SourceText};

/// One parsed document.
///
/// The root is created once; the compilation refers to nodes of this root,
/// so the same tree must be handed to the analyzer.
#[derive(Debug, Clone)]
pub struct MiniDocument {
    id: DocumentId,
    text: SourceText,
    root: SyntaxNode,
    errors: Vec<SyntaxError>,
    version: u32,
}

impl MiniDocument {
    fn new(id: DocumentId, text: SourceText, version: u32) -> Self {
        let parse = parse(text.as_str());
        Self {
            id,
            root: parse.syntax(),
            errors: parse.errors,
            text,
            version,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &SmolStr {
        self.text.path()
    }

    pub fn text(&self) -> &SourceText {
        &self.text
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_syntax_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of edits applied since the document was added.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn snapshot(&self) -> DocumentSnapshot<'_, MiniLanguage> {
        DocumentSnapshot {
            id: self.id,
            text: &self.text,
            root: self.root.clone(),
            has_syntax_errors: self.has_syntax_errors(),
        }
    }
}

/// Documents of one program and the compilation built from them.
#[derive(Debug, Clone)]
pub struct Project {
    documents: IndexMap<DocumentId, MiniDocument>,
    compilation: Compilation,
}

impl Default for Project {
    fn default() -> Self {
        Self::from_documents(IndexMap::new())
    }
}

impl Project {
    /// Build a project from `(path, text)` pairs; ids are assigned in order.
    pub fn from_sources<I, P, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<SmolStr>,
        T: Into<String>,
    {
        let documents = sources
            .into_iter()
            .enumerate()
            .map(|(index, (path, text))| {
                let id = DocumentId::new(index as u32);
                (id, MiniDocument::new(id, SourceText::new(path, text), 0))
            })
            .collect();
        Self::from_documents(documents)
    }

    fn from_documents(documents: IndexMap<DocumentId, MiniDocument>) -> Self {
        let compilation = Compilation::new(documents.values().map(|d| (d.id, &d.root)));
        debug!(
            "[PROJECT] {} documents, {} semantic errors",
            documents.len(),
            compilation.errors().len()
        );
        Self {
            documents,
            compilation,
        }
    }

    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    pub fn document(&self, id: DocumentId) -> Option<&MiniDocument> {
        self.documents.get(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &MiniDocument> {
        self.documents.values()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document_id(&self, path: &str) -> Option<DocumentId> {
        self.documents
            .values()
            .find(|d| d.path() == path)
            .map(|d| d.id)
    }

    pub fn snapshot(&self, id: DocumentId) -> Option<DocumentSnapshot<'_, MiniLanguage>> {
        self.document(id).map(MiniDocument::snapshot)
    }

    /// The project with the text of document `id` replaced.
    ///
    /// Returns `None` if the document is not part of the project.
    pub fn with_text(&self, id: DocumentId, text: impl Into<String>) -> Option<Project> {
        let old = self.documents.get(&id)?;
        let document = MiniDocument::new(id, SourceText::new(old.path().clone(), text), old.version + 1);

        let mut documents = self.documents.clone();
        documents.insert(id, document);
        Some(Self::from_documents(documents))
    }

    /// The project with a new document appended, and the new document's id.
    pub fn with_document(&self, path: impl Into<SmolStr>, text: impl Into<String>) -> (Project, DocumentId) {
        let next = self.documents.keys().map(|id| id.index() + 1).max().unwrap_or(0);
        let id = DocumentId::new(next);

        let mut documents = self.documents.clone();
        documents.insert(id, MiniDocument::new(id, SourceText::new(path, text), 0));
        (Self::from_documents(documents), id)
    }

    /// The project without document `id`.
    pub fn without_document(&self, id: DocumentId) -> Project {
        let mut documents = self.documents.clone();
        documents.shift_remove(&id);
        Self::from_documents(documents)
    }
}
