//! Reading-order selection for multi-page export.
//!
//! The renderer that turns the sequence into a PDF lives in the host.

use crate::model::document::{Document, DocumentId};
use crate::tree::forest::{build_tree, descendants_in, flatten};
use crate::tree::siblings::SiblingIndex;
use log::{debug, warn};
use std::collections::BTreeSet;

/// Documents of every selected subtree, in reading order, each once.
///
/// Selecting a node and one of its descendants does not duplicate the
/// descendant. Unknown ids are skipped. An empty selection yields an empty
/// list.
pub fn export_order(documents: &[Document], selected_ids: &[DocumentId]) -> Vec<Document> {
    let index = SiblingIndex::new(documents);
    let mut included: BTreeSet<DocumentId> = BTreeSet::new();
    for id in selected_ids {
        if !index.contains(id) {
            warn!("event=export_order module=export status=skipped reason=unknown_id id={id}");
            continue;
        }
        included.insert(id.clone());
        included.extend(descendants_in(&index, id));
    }

    let ordered: Vec<Document> = flatten(&build_tree(documents, None))
        .into_iter()
        .filter(|doc| included.contains(&doc.id))
        .collect();
    debug!(
        "event=export_order module=export status=ok selected={} documents={}",
        selected_ids.len(),
        ordered.len()
    );
    ordered
}
