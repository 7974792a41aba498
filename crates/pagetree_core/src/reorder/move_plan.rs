//! Drag-and-drop / move-dialog relocation planning.
//!
//! # Responsibility
//! - Validate a move intent against the current snapshot.
//! - Compute the patch set that relocates one document and renumbers the
//!   sibling groups it leaves and enters.
//!
//! # Invariants
//! - A rejected move yields no patches.
//! - After the full patch set is applied, both touched sibling groups are
//!   numbered `0..n` with no gaps or duplicates.
//! - Re-planning the same intent on the patched collection yields no
//!   patches.

use crate::model::document::{Document, DocumentId};
use crate::model::patch::DocumentPatch;
use crate::tree::forest::descendants_in;
use crate::tree::siblings::SiblingIndex;
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Requested relocation of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub moving_id: DocumentId,
    /// `None` targets root level.
    pub destination_parent_id: Option<DocumentId>,
    /// Position among the destination's other children. `None` appends.
    pub destination_index: Option<usize>,
}

impl MoveIntent {
    /// Drop between siblings at `index` (clamped to the group length).
    pub fn drop_at(
        moving_id: impl Into<DocumentId>,
        destination_parent_id: Option<DocumentId>,
        index: usize,
    ) -> Self {
        Self {
            moving_id: moving_id.into(),
            destination_parent_id,
            destination_index: Some(index),
        }
    }

    /// Drop onto a node, or confirm a move dialog: append as last child.
    pub fn nest_inside(
        moving_id: impl Into<DocumentId>,
        destination_parent_id: Option<DocumentId>,
    ) -> Self {
        Self {
            moving_id: moving_id.into(),
            destination_parent_id,
            destination_index: None,
        }
    }
}

/// Patches produced by an accepted move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovePlan {
    pub patches: Vec<DocumentPatch>,
}

impl MovePlan {
    /// True when the document already sits where it was dropped.
    pub fn is_noop(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Reasons a move is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The moving document is not in the snapshot.
    DocumentNotFound(DocumentId),
    /// The destination parent is not in the snapshot.
    ParentNotFound(DocumentId),
    /// A document cannot become its own parent.
    SelfParent(DocumentId),
    /// The destination parent is a descendant of the moving document.
    CycleDetected {
        moving_id: DocumentId,
        parent_id: DocumentId,
    },
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "destination parent not found: {id}"),
            Self::SelfParent(id) => write!(f, "document cannot be its own parent: {id}"),
            Self::CycleDetected {
                moving_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: document {moving_id} under descendant {parent_id}"
            ),
        }
    }
}

impl Error for MoveError {}

impl MoveError {
    fn reason_code(&self) -> &'static str {
        match self {
            Self::DocumentNotFound(_) => "document_not_found",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::SelfParent(_) => "self_parent",
            Self::CycleDetected { .. } => "cycle",
        }
    }
}

/// Plans `intent` against `documents`.
///
/// # Errors
/// - [`MoveError::DocumentNotFound`] when the moving id is unknown.
/// - [`MoveError::SelfParent`] / [`MoveError::CycleDetected`] when the
///   destination is the document itself or one of its descendants.
/// - [`MoveError::ParentNotFound`] when the destination parent is unknown.
pub fn plan_move(documents: &[Document], intent: &MoveIntent) -> Result<MovePlan, MoveError> {
    let result = compute_move(documents, intent);
    match &result {
        Ok(plan) => debug!(
            "event=move_plan module=reorder status=ok moving_id={} patches={}",
            intent.moving_id,
            plan.patches.len()
        ),
        Err(err) => info!(
            "event=move_plan module=reorder status=rejected moving_id={} reason={}",
            intent.moving_id,
            err.reason_code()
        ),
    }
    result
}

fn compute_move(documents: &[Document], intent: &MoveIntent) -> Result<MovePlan, MoveError> {
    let index = SiblingIndex::new(documents);
    let moving = index
        .get(&intent.moving_id)
        .ok_or_else(|| MoveError::DocumentNotFound(intent.moving_id.clone()))?;

    let new_parent = intent.destination_parent_id.as_ref();
    if let Some(parent_id) = new_parent {
        if *parent_id == moving.id {
            return Err(MoveError::SelfParent(parent_id.clone()));
        }
        if !index.contains(parent_id) {
            return Err(MoveError::ParentNotFound(parent_id.clone()));
        }
        if descendants_in(&index, &moving.id).contains(parent_id) {
            return Err(MoveError::CycleDetected {
                moving_id: moving.id.clone(),
                parent_id: parent_id.clone(),
            });
        }
    }

    let mut destination: Vec<&Document> = index
        .children(new_parent)
        .iter()
        .copied()
        .filter(|doc| doc.id != moving.id)
        .collect();
    let slot = intent
        .destination_index
        .unwrap_or(destination.len())
        .min(destination.len());
    destination.insert(slot, moving);

    let mut patches = Vec::new();
    for (position, doc) in destination.into_iter().enumerate() {
        let order = position as i64;
        if doc.id == moving.id {
            if doc.parent_id.as_ref() != new_parent || doc.order != Some(order) {
                patches.push(DocumentPatch::relocate(
                    doc.id.clone(),
                    new_parent.cloned(),
                    order,
                ));
            }
        } else if doc.order != Some(order) {
            patches.push(DocumentPatch::order(doc.id.clone(), order));
        }
    }

    let old_parent = index.effective_parent(moving);
    if old_parent != new_parent {
        let remaining = index
            .children(old_parent)
            .iter()
            .filter(|doc| doc.id != moving.id);
        patches.extend(renumber(remaining.copied()));
    }

    Ok(MovePlan { patches })
}

/// Order patches that number `siblings` as `0..n` in iteration order.
pub(crate) fn renumber<'a>(
    siblings: impl Iterator<Item = &'a Document> + 'a,
) -> impl Iterator<Item = DocumentPatch> + 'a {
    siblings.enumerate().filter_map(|(position, doc)| {
        let order = position as i64;
        (doc.order != Some(order)).then(|| DocumentPatch::order(doc.id.clone(), order))
    })
}

#[cfg(test)]
mod tests {
    use super::{plan_move, MoveError, MoveIntent};
    use crate::model::document::{Document, DocumentId};
    use crate::model::patch::{apply_patches, DocumentPatch};

    fn id(value: &str) -> DocumentId {
        DocumentId::new(value)
    }

    fn intro_rules_sub() -> Vec<Document> {
        vec![
            Document::new("A", "Intro").with_order(0),
            Document::new("B", "Rules").with_order(1),
            Document::new("C", "Sub").with_parent("A").with_order(0),
        ]
    }

    #[test]
    fn reparent_into_first_slot_renumbers_new_siblings_only() {
        let plan = plan_move(&intro_rules_sub(), &MoveIntent::drop_at("B", Some(id("A")), 0))
            .unwrap();
        assert_eq!(
            plan.patches,
            vec![
                DocumentPatch::relocate(id("B"), Some(id("A")), 0),
                DocumentPatch::order(id("C"), 1),
            ]
        );
    }

    #[test]
    fn reorder_within_group_shifts_neighbors() {
        let docs = vec![
            Document::new("a", "A").with_order(0),
            Document::new("b", "B").with_order(1),
            Document::new("c", "C").with_order(2),
        ];
        let plan = plan_move(&docs, &MoveIntent::drop_at("c", None, 0)).unwrap();
        assert_eq!(
            plan.patches,
            vec![
                DocumentPatch::relocate(id("c"), None, 0),
                DocumentPatch::order(id("a"), 1),
                DocumentPatch::order(id("b"), 2),
            ]
        );
    }

    #[test]
    fn moving_out_closes_gap_in_source_group() {
        let docs = vec![
            Document::new("p", "P").with_order(0),
            Document::new("x", "X").with_parent("p").with_order(0),
            Document::new("y", "Y").with_parent("p").with_order(1),
        ];
        let plan = plan_move(&docs, &MoveIntent::nest_inside("x", None)).unwrap();
        assert_eq!(
            plan.patches,
            vec![
                DocumentPatch::relocate(id("x"), None, 1),
                DocumentPatch::order(id("y"), 0),
            ]
        );
    }

    #[test]
    fn index_past_end_is_clamped_to_append() {
        let docs = vec![
            Document::new("a", "A").with_order(0),
            Document::new("b", "B").with_order(1),
        ];
        let plan = plan_move(&docs, &MoveIntent::drop_at("a", None, 99)).unwrap();
        let merged = apply_patches(&docs, &plan.patches);
        assert_eq!(merged[0].order, Some(1));
        assert_eq!(merged[1].order, Some(0));
    }

    #[test]
    fn same_slot_is_a_noop() {
        let plan = plan_move(&intro_rules_sub(), &MoveIntent::drop_at("B", None, 1)).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn rejects_self_parent_and_descendant_parent() {
        let docs = intro_rules_sub();
        assert_eq!(
            plan_move(&docs, &MoveIntent::nest_inside("A", Some(id("A")))),
            Err(MoveError::SelfParent(id("A")))
        );
        assert_eq!(
            plan_move(&docs, &MoveIntent::nest_inside("A", Some(id("C")))),
            Err(MoveError::CycleDetected {
                moving_id: id("A"),
                parent_id: id("C"),
            })
        );
    }

    #[test]
    fn rejects_unknown_ids() {
        let docs = intro_rules_sub();
        assert_eq!(
            plan_move(&docs, &MoveIntent::nest_inside("zz", None)),
            Err(MoveError::DocumentNotFound(id("zz")))
        );
        assert_eq!(
            plan_move(&docs, &MoveIntent::nest_inside("B", Some(id("zz")))),
            Err(MoveError::ParentNotFound(id("zz")))
        );
    }

    #[test]
    fn moving_dangling_document_repairs_its_parent() {
        let docs = vec![
            Document::new("a", "A").with_order(0),
            Document::new("o", "O").with_parent("gone").with_order(1),
        ];
        let plan = plan_move(&docs, &MoveIntent::drop_at("o", None, 1)).unwrap();
        assert_eq!(
            plan.patches,
            vec![DocumentPatch::relocate(id("o"), None, 1)]
        );
    }

    #[test]
    fn missing_orders_are_normalized_in_destination() {
        let docs = vec![
            Document::new("a", "A"),
            Document::new("b", "B"),
            Document::new("m", "M").with_parent("a"),
        ];
        let plan = plan_move(&docs, &MoveIntent::drop_at("m", None, 1)).unwrap();
        assert_eq!(
            plan.patches,
            vec![
                DocumentPatch::order(id("a"), 0),
                DocumentPatch::relocate(id("m"), None, 1),
                DocumentPatch::order(id("b"), 2),
            ]
        );
    }
}
