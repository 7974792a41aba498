//! Delete planning for documents that may have children.
//!
//! # Responsibility
//! - Decide which ids disappear for a delete request.
//! - Emit the patches that keep the surviving sibling groups contiguous and
//!   free of dangling parents.
//!
//! # Invariants
//! - `Cascade` removes the target and every descendant.
//! - `PromoteChildren` removes only the target; its children take its slot
//!   under the target's former parent, in their current order.
//! - Promotion never makes a document its own parent. When the target's
//!   parent is one of its own descendants, children go to root level.

use super::move_plan::renumber;
use crate::model::document::{Document, DocumentId};
use crate::model::patch::DocumentPatch;
use crate::tree::forest::{build_tree, descendants_in, flatten};
use crate::tree::siblings::SiblingIndex;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What happens to the children of a deleted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Delete the whole subtree.
    Cascade,
    /// Delete the document only and lift its children one level.
    PromoteChildren,
}

/// Ids to remove plus patches for surviving documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlan {
    /// Target first, then descendants in reading order.
    pub removed_ids: Vec<DocumentId>,
    pub patches: Vec<DocumentPatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    DocumentNotFound(DocumentId),
}

impl Display for DeleteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for DeleteError {}

/// Plans removal of `id` under `mode`.
pub fn plan_delete(
    documents: &[Document],
    id: &DocumentId,
    mode: DeleteMode,
) -> Result<DeletePlan, DeleteError> {
    let index = SiblingIndex::new(documents);
    let target = index
        .get(id)
        .ok_or_else(|| DeleteError::DocumentNotFound(id.clone()))?;
    let parent = index.effective_parent(target);

    let plan = match mode {
        DeleteMode::Cascade => {
            let mut removed_ids = vec![target.id.clone()];
            removed_ids.extend(
                flatten(&build_tree(documents, Some(&target.id)))
                    .into_iter()
                    .map(|doc| doc.id),
            );
            let survivors = index
                .children(parent)
                .iter()
                .copied()
                .filter(|doc| doc.id != target.id);
            DeletePlan {
                removed_ids,
                patches: renumber(survivors).collect(),
            }
        }
        DeleteMode::PromoteChildren => {
            let children = index.children(Some(&target.id));
            let on_cycle =
                parent.is_some_and(|p| descendants_in(&index, &target.id).contains(p));
            let patches = if on_cycle {
                promote_out_of_cycle(&index, target, parent, children)
            } else {
                promote_into_slot(&index, target, parent, children)
            };
            DeletePlan {
                removed_ids: vec![target.id.clone()],
                patches,
            }
        }
    };

    info!(
        "event=delete_plan module=reorder status=ok mode={:?} removed={} patches={}",
        mode,
        plan.removed_ids.len(),
        plan.patches.len()
    );
    Ok(plan)
}

fn promote_into_slot(
    index: &SiblingIndex<'_>,
    target: &Document,
    parent: Option<&DocumentId>,
    children: &[&Document],
) -> Vec<DocumentPatch> {
    let mut patches = Vec::new();
    let mut position = 0_i64;
    for &sibling in index.children(parent) {
        if sibling.id != target.id {
            if sibling.order != Some(position) {
                patches.push(DocumentPatch::order(sibling.id.clone(), position));
            }
            position += 1;
            continue;
        }
        for child in children {
            patches.push(DocumentPatch::relocate(
                child.id.clone(),
                parent.cloned(),
                position,
            ));
            position += 1;
        }
    }
    patches
}

/// The target sits on a stored cycle: its parent is one of its own
/// descendants. Children are appended at root level, which breaks the cycle.
fn promote_out_of_cycle(
    index: &SiblingIndex<'_>,
    target: &Document,
    parent: Option<&DocumentId>,
    children: &[&Document],
) -> Vec<DocumentPatch> {
    let survivors = index
        .children(parent)
        .iter()
        .copied()
        .filter(|doc| doc.id != target.id);
    let mut patches: Vec<DocumentPatch> = renumber(survivors).collect();

    let roots = index.children(None);
    patches.extend(renumber(roots.iter().copied()));
    let base = roots.len() as i64;
    patches.extend(
        children
            .iter()
            .zip(base..)
            .map(|(child, order)| DocumentPatch::relocate(child.id.clone(), None, order)),
    );
    warn!(
        "event=delete_plan module=reorder status=cycle_broken target_id={} promoted={}",
        target.id,
        children.len()
    );
    patches
}
