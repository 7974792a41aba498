//! Consistency diagnostics for stored collections.
//!
//! Reports what the tree builder silently tolerates so hosts can surface
//! or repair it. Never modifies input.

use super::siblings::SiblingIndex;
use crate::model::document::{Document, DocumentId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One consistency problem found in a flat collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeIssue {
    /// More than one document carries this id.
    DuplicateId { id: DocumentId },
    /// `parent_id` names a document that is not in the collection.
    DanglingParent { id: DocumentId, parent_id: DocumentId },
    /// `parent_id` names the document itself.
    SelfParent { id: DocumentId },
    /// Ids forming one `parent_id` cycle, sorted.
    Cycle { ids: Vec<DocumentId> },
    /// Sibling group whose orders are not exactly `0..n`.
    NonContiguousOrder {
        parent_id: Option<DocumentId>,
        orders: Vec<Option<i64>>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Walk {
    OnPath,
    Done,
}

/// Lists every consistency problem in `documents`.
///
/// An empty result means the collection satisfies the forest invariants,
/// including contiguous sibling orders.
pub fn check_documents(documents: &[Document]) -> Vec<TreeIssue> {
    let mut issues = Vec::new();

    let mut seen_ids = HashSet::new();
    let mut reported = HashSet::new();
    for document in documents {
        if !seen_ids.insert(&document.id) && reported.insert(&document.id) {
            issues.push(TreeIssue::DuplicateId {
                id: document.id.clone(),
            });
        }
    }

    for document in documents {
        match &document.parent_id {
            Some(parent_id) if *parent_id == document.id => issues.push(TreeIssue::SelfParent {
                id: document.id.clone(),
            }),
            Some(parent_id) if !seen_ids.contains(parent_id) => {
                issues.push(TreeIssue::DanglingParent {
                    id: document.id.clone(),
                    parent_id: parent_id.clone(),
                })
            }
            _ => {}
        }
    }

    issues.extend(find_cycles(documents));

    let index = SiblingIndex::new(documents);
    for (parent_id, siblings) in index.groups() {
        let contiguous = siblings
            .iter()
            .enumerate()
            .all(|(position, doc)| doc.order == Some(position as i64));
        if !contiguous {
            issues.push(TreeIssue::NonContiguousOrder {
                parent_id: parent_id.cloned(),
                orders: siblings.iter().map(|doc| doc.order).collect(),
            });
        }
    }

    issues
}

fn find_cycles(documents: &[Document]) -> Vec<TreeIssue> {
    let parents: HashMap<&DocumentId, &DocumentId> = documents
        .iter()
        .filter_map(|doc| {
            let parent_id = doc.parent_id.as_ref()?;
            (*parent_id != doc.id).then_some((&doc.id, parent_id))
        })
        .collect();

    let mut state: HashMap<&DocumentId, Walk> = HashMap::new();
    let mut cycles = Vec::new();
    for document in documents {
        let mut path: Vec<&DocumentId> = Vec::new();
        let mut cursor = Some(&document.id);
        while let Some(current) = cursor {
            match state.get(current) {
                Some(Walk::Done) => break,
                Some(Walk::OnPath) => {
                    if let Some(start) = path.iter().position(|id| *id == current) {
                        let mut ids: Vec<DocumentId> =
                            path[start..].iter().map(|id| (*id).clone()).collect();
                        ids.sort();
                        cycles.push(TreeIssue::Cycle { ids });
                    }
                    break;
                }
                None => {
                    state.insert(current, Walk::OnPath);
                    path.push(current);
                    cursor = parents.get(current).copied();
                }
            }
        }
        for id in path {
            state.insert(id, Walk::Done);
        }
    }
    cycles
}
