//! Page tree use-case service.
//!
//! # Responsibility
//! - Serialize every mutation as snapshot -> plan -> apply full patch set,
//!   so the next request always plans against fresh data.
//! - Offer create, rename, move, delete, tree, search and export use-cases
//!   on top of any [`DocumentRepository`].
//!
//! # Invariants
//! - A rejected plan leaves the store untouched.
//! - Parents referenced on create must exist.
//! - Stored titles are written verbatim; blank titles are allowed.

use crate::export::export_order;
use crate::model::document::{Document, DocumentId};
use crate::reorder::delete_plan::{plan_delete, DeleteError, DeleteMode, DeletePlan};
use crate::reorder::move_plan::{plan_move, MoveError, MoveIntent, MovePlan};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use crate::search::title::{search_documents, SearchError, SearchOutcome};
use crate::tree::forest::{build_tree, TreeNode};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from page tree service operations.
#[derive(Debug)]
pub enum TreeServiceError {
    /// Target document does not exist.
    DocumentNotFound(DocumentId),
    /// Parent document does not exist.
    ParentNotFound(DocumentId),
    /// Move was refused by the reorder engine.
    Move(MoveError),
    /// Delete was refused by the planner.
    Delete(DeleteError),
    /// Search query could not be compiled.
    Search(SearchError),
    /// Store-level failure.
    Repo(RepoError),
}

impl Display for TreeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent document not found: {id}"),
            Self::Move(err) => write!(f, "{err}"),
            Self::Delete(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TreeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Move(err) => Some(err),
            Self::Delete(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TreeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DocumentNotFound(id) => Self::DocumentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<MoveError> for TreeServiceError {
    fn from(value: MoveError) -> Self {
        Self::Move(value)
    }
}

impl From<DeleteError> for TreeServiceError {
    fn from(value: DeleteError) -> Self {
        match value {
            DeleteError::DocumentNotFound(id) => Self::DocumentNotFound(id),
        }
    }
}

impl From<SearchError> for TreeServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

/// Page tree service facade.
pub struct TreeService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> TreeService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Consumes the service and returns the repository.
    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Current flat collection.
    pub fn documents(&self) -> Result<Vec<Document>, TreeServiceError> {
        self.repo.list_documents().map_err(Into::into)
    }

    /// Creates one document as last child of an optional parent.
    pub fn create_document(
        &self,
        parent_id: Option<&DocumentId>,
        title: impl Into<String>,
    ) -> Result<Document, TreeServiceError> {
        if let Some(parent_id) = parent_id {
            self.repo
                .get_document(parent_id)?
                .ok_or_else(|| TreeServiceError::ParentNotFound(parent_id.clone()))?;
        }
        let document = self.repo.create_document(parent_id, &title.into())?;
        info!(
            "event=document_create module=service status=ok id={} root={}",
            document.id,
            parent_id.is_none()
        );
        Ok(document)
    }

    /// Renames one document. The title is stored as given.
    pub fn rename_document(
        &self,
        id: &DocumentId,
        title: impl Into<String>,
    ) -> Result<(), TreeServiceError> {
        self.repo.update_title(id, &title.into())?;
        info!("event=document_rename module=service status=ok id={id}");
        Ok(())
    }

    /// Plans and applies one move.
    pub fn move_document(&self, intent: &MoveIntent) -> Result<MovePlan, TreeServiceError> {
        let snapshot = self.repo.list_documents()?;
        let plan = plan_move(&snapshot, intent)?;
        if !plan.is_noop() {
            self.repo.apply_patches(&plan.patches)?;
        }
        info!(
            "event=document_move module=service status=ok id={} patches={}",
            intent.moving_id,
            plan.patches.len()
        );
        Ok(plan)
    }

    /// Plans and applies one delete.
    pub fn delete_document(
        &self,
        id: &DocumentId,
        mode: DeleteMode,
    ) -> Result<DeletePlan, TreeServiceError> {
        let snapshot = self.repo.list_documents()?;
        let plan = plan_delete(&snapshot, id, mode)?;
        self.repo.apply_delete(&plan.patches, &plan.removed_ids)?;
        info!(
            "event=document_delete module=service status=ok id={} removed={}",
            id,
            plan.removed_ids.len()
        );
        Ok(plan)
    }

    /// Builds the full forest from the current collection.
    pub fn tree(&self) -> Result<Vec<TreeNode>, TreeServiceError> {
        Ok(build_tree(&self.repo.list_documents()?, None))
    }

    /// Title search; `None` means the query does not filter.
    pub fn search(&self, query: &str) -> Result<Option<SearchOutcome>, TreeServiceError> {
        let snapshot = self.repo.list_documents()?;
        search_documents(&snapshot, query).map_err(Into::into)
    }

    /// Documents of the selected subtrees in reading order.
    pub fn export(&self, selected_ids: &[DocumentId]) -> Result<Vec<Document>, TreeServiceError> {
        Ok(export_order(&self.repo.list_documents()?, selected_ids))
    }
}
