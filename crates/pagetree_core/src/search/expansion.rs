//! Sidebar expand/collapse state as an explicit value.
//!
//! Hosts keep one `ExpansionState` per sidebar, pass it into rendering and
//! get a new set back from each call. Nothing here is global.

use super::title::SearchOutcome;
use crate::model::document::{Document, DocumentId};
use crate::tree::forest::ancestors_in;
use crate::tree::siblings::SiblingIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionState {
    expanded_ids: BTreeSet<DocumentId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &DocumentId) -> bool {
        self.expanded_ids.contains(id)
    }

    pub fn expanded_ids(&self) -> &BTreeSet<DocumentId> {
        &self.expanded_ids
    }

    pub fn expand(&mut self, id: DocumentId) {
        self.expanded_ids.insert(id);
    }

    pub fn collapse(&mut self, id: &DocumentId) {
        self.expanded_ids.remove(id);
    }

    /// Flips `id` and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &DocumentId) -> bool {
        if self.expanded_ids.remove(id) {
            false
        } else {
            self.expanded_ids.insert(id.clone());
            true
        }
    }

    /// Expands every ancestor of `id`, e.g. after a move or a new child.
    pub fn reveal(&mut self, id: &DocumentId, documents: &[Document]) {
        let index = SiblingIndex::new(documents);
        self.expanded_ids.extend(ancestors_in(&index, id));
    }

    /// Drops ids that no longer exist in `documents`.
    pub fn retain_existing(&mut self, documents: &[Document]) {
        let live: HashSet<&DocumentId> = documents.iter().map(|doc| &doc.id).collect();
        self.expanded_ids.retain(|id| live.contains(id));
    }

    /// Ids to render open: user state plus search-forced ancestors.
    ///
    /// The user state itself is left untouched, so clearing the query
    /// restores the previous layout.
    pub fn effective(&self, search: Option<&SearchOutcome>) -> BTreeSet<DocumentId> {
        let mut open = self.expanded_ids.clone();
        if let Some(outcome) = search {
            open.extend(outcome.expanded_ids.iter().cloned());
        }
        open
    }
}
