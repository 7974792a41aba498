//! Field-level updates emitted by the core for the host to persist.
//!
//! # Invariants
//! - A patch only names fields that change.
//! - A patch set is meant to be applied in full; a subset can leave a
//!   sibling group with duplicate orders.

use super::document::{Document, DocumentId};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Partial update for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    pub id: DocumentId,
    /// `None`: parent unchanged. `Some(None)`: move to root.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub parent_id: Option<Option<DocumentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl DocumentPatch {
    /// Patch that only renumbers a document inside its current group.
    pub fn order(id: DocumentId, order: i64) -> Self {
        Self {
            id,
            parent_id: None,
            order: Some(order),
        }
    }

    /// Patch that moves a document under a parent at a position.
    pub fn relocate(id: DocumentId, parent_id: Option<DocumentId>, order: i64) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
            order: Some(order),
        }
    }

    /// Writes the patched fields onto `document`.
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(parent_id) = &self.parent_id {
            document.parent_id = parent_id.clone();
        }
        if let Some(order) = self.order {
            document.order = Some(order);
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Returns a copy of `documents` with every patch merged in.
///
/// Patches that name an id missing from the collection are skipped.
pub fn apply_patches(documents: &[Document], patches: &[DocumentPatch]) -> Vec<Document> {
    let mut merged = documents.to_vec();
    let index: HashMap<DocumentId, usize> = merged
        .iter()
        .enumerate()
        .map(|(position, doc)| (doc.id.clone(), position))
        .collect();

    for patch in patches {
        match index.get(&patch.id) {
            Some(&position) => patch.apply_to(&mut merged[position]),
            None => warn!(
                "event=patch_apply module=model status=skipped reason=unknown_id id={}",
                patch.id
            ),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{apply_patches, DocumentPatch};
    use crate::model::document::{Document, DocumentId};
    use serde_json::json;

    #[test]
    fn root_move_serializes_explicit_null_parent() {
        let patch = DocumentPatch::relocate(DocumentId::new("b"), None, 2);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "id": "b", "parentId": null, "order": 2 }));
    }

    #[test]
    fn order_only_patch_omits_parent() {
        let patch = DocumentPatch::order(DocumentId::new("c"), 1);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "id": "c", "order": 1 }));
    }

    #[test]
    fn deserialize_keeps_null_and_absent_parent_apart() {
        let to_root: DocumentPatch =
            serde_json::from_value(json!({ "id": "b", "parentId": null })).unwrap();
        assert_eq!(to_root.parent_id, Some(None));

        let untouched: DocumentPatch =
            serde_json::from_value(json!({ "id": "b", "order": 3 })).unwrap();
        assert_eq!(untouched.parent_id, None);
    }

    #[test]
    fn apply_patches_leaves_input_untouched_and_skips_unknown_ids() {
        let docs = vec![Document::new("a", "A").with_order(0)];
        let patches = vec![
            DocumentPatch::order(DocumentId::new("a"), 4),
            DocumentPatch::order(DocumentId::new("ghost"), 1),
        ];

        let merged = apply_patches(&docs, &patches);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].order, Some(4));
        assert_eq!(docs[0].order, Some(0));
    }
}
