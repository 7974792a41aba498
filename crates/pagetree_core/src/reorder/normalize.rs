//! Whole-collection order normalization.

use super::move_plan::renumber;
use crate::model::document::Document;
use crate::model::patch::DocumentPatch;
use crate::tree::siblings::SiblingIndex;

/// Renumbers every sibling group to `0..n` in display order.
///
/// Useful after importing data with gaps, duplicates or missing orders.
/// Root group patches come first.
pub fn normalize_orders(documents: &[Document]) -> Vec<DocumentPatch> {
    let index = SiblingIndex::new(documents);
    index
        .groups()
        .flat_map(|(_, siblings)| renumber(siblings.iter().copied()))
        .collect()
}
