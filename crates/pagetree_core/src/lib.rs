//! Core page tree logic for PageTree.
//! This crate owns the tree invariants; hosts own storage and rendering.

pub mod export;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod repo;
pub mod search;
pub mod service;
pub mod tree;

pub use export::export_order;
pub use logging::{default_log_level, init_logging};
pub use model::document::{Document, DocumentId, UNTITLED_LABEL};
pub use model::patch::{apply_patches, DocumentPatch};
pub use reorder::delete_plan::{plan_delete, DeleteError, DeleteMode, DeletePlan};
pub use reorder::move_plan::{plan_move, MoveError, MoveIntent, MovePlan};
pub use reorder::normalize::normalize_orders;
pub use repo::document_repo::{
    DocumentRepository, MemoryDocumentRepository, RepoError, RepoResult,
};
pub use search::expansion::ExpansionState;
pub use search::title::{
    filter_forest, search_documents, SearchError, SearchOutcome, SearchResult, TitleQuery,
};
pub use service::tree_service::{TreeService, TreeServiceError};
pub use tree::check::{check_documents, TreeIssue};
pub use tree::forest::{
    ancestor_ids, build_tree, collect_descendant_ids, find_node, flatten, TreeNode,
};
pub use tree::siblings::compare_siblings;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
