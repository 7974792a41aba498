//! Document store contract and in-process implementation.
//!
//! # Responsibility
//! - Describe the store operations the tree service needs from its host.
//! - Provide an in-memory store for embedding, tools and tests.
//!
//! # Invariants
//! - `apply_patches` is all-or-nothing: unknown ids reject the whole set.
//! - New documents are appended at the end of their sibling group.
//! - Listing returns documents in insertion order; callers never rely on it.

use crate::model::document::{Document, DocumentId};
use crate::model::patch::DocumentPatch;
use std::cell::RefCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by document repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Target document does not exist.
    DocumentNotFound(DocumentId),
    /// Insert would reuse an existing id.
    DuplicateId(DocumentId),
    /// Backend-specific failure reported by a host store.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::DuplicateId(id) => write!(f, "document id already exists: {id}"),
            Self::Backend(message) => write!(f, "document store failure: {message}"),
        }
    }
}

impl Error for RepoError {}

/// Store operations consumed by [`crate::service::tree_service::TreeService`].
pub trait DocumentRepository {
    /// Returns the full flat collection.
    fn list_documents(&self) -> RepoResult<Vec<Document>>;
    /// Loads one document by id.
    fn get_document(&self, id: &DocumentId) -> RepoResult<Option<Document>>;
    /// Stores a new document as last child of `parent_id`.
    fn create_document(
        &self,
        parent_id: Option<&DocumentId>,
        title: &str,
    ) -> RepoResult<Document>;
    /// Replaces one stored title verbatim.
    fn update_title(&self, id: &DocumentId, title: &str) -> RepoResult<()>;
    /// Applies a full patch set atomically.
    fn apply_patches(&self, patches: &[DocumentPatch]) -> RepoResult<()>;
    /// Applies `patches` and removes `removed_ids` as one atomic change.
    ///
    /// Either every patch and removal lands or the store is unchanged.
    fn apply_delete(
        &self,
        patches: &[DocumentPatch],
        removed_ids: &[DocumentId],
    ) -> RepoResult<()>;
}

/// Single-threaded in-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    documents: RefCell<Vec<Document>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing collection.
    ///
    /// # Errors
    /// - [`RepoError::DuplicateId`] when two documents share an id.
    pub fn from_documents(documents: Vec<Document>) -> RepoResult<Self> {
        let mut seen = HashSet::new();
        for document in &documents {
            if !seen.insert(&document.id) {
                return Err(RepoError::DuplicateId(document.id.clone()));
            }
        }
        Ok(Self {
            documents: RefCell::new(documents),
        })
    }

    /// Copies the current collection.
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.borrow().clone()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents.into_inner()
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        Ok(self.snapshot())
    }

    fn get_document(&self, id: &DocumentId) -> RepoResult<Option<Document>> {
        Ok(self
            .documents
            .borrow()
            .iter()
            .find(|doc| doc.id == *id)
            .cloned())
    }

    fn create_document(
        &self,
        parent_id: Option<&DocumentId>,
        title: &str,
    ) -> RepoResult<Document> {
        let mut documents = self.documents.borrow_mut();
        let next_order = documents
            .iter()
            .filter(|doc| doc.parent_id.as_ref() == parent_id)
            .filter_map(|doc| doc.order)
            .max()
            .map_or(0, |max| max + 1);

        let mut document = Document::new(DocumentId::generate(), title).with_order(next_order);
        document.parent_id = parent_id.cloned();
        documents.push(document.clone());
        Ok(document)
    }

    fn update_title(&self, id: &DocumentId, title: &str) -> RepoResult<()> {
        let mut documents = self.documents.borrow_mut();
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == *id)
            .ok_or_else(|| RepoError::DocumentNotFound(id.clone()))?;
        document.title = title.to_string();
        Ok(())
    }

    fn apply_patches(&self, patches: &[DocumentPatch]) -> RepoResult<()> {
        self.apply_delete(patches, &[])
    }

    fn apply_delete(
        &self,
        patches: &[DocumentPatch],
        removed_ids: &[DocumentId],
    ) -> RepoResult<()> {
        let mut documents = self.documents.borrow_mut();
        let stored: HashSet<&DocumentId> = documents.iter().map(|doc| &doc.id).collect();
        let mut touched = patches.iter().map(|patch| &patch.id).chain(removed_ids);
        if let Some(missing) = touched.find(|id| !stored.contains(id)) {
            return Err(RepoError::DocumentNotFound(missing.clone()));
        }

        for patch in patches {
            if let Some(document) = documents.iter_mut().find(|doc| doc.id == patch.id) {
                patch.apply_to(document);
            }
        }
        let doomed: HashSet<&DocumentId> = removed_ids.iter().collect();
        documents.retain(|doc| !doomed.contains(&doc.id));
        Ok(())
    }
}
