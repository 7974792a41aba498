//! Sibling grouping and the canonical sibling order.
//!
//! # Invariants
//! - Every module that talks about "position among siblings" uses
//!   [`compare_siblings`] through [`SiblingIndex`], so engine indices match
//!   what the tree view displays.
//! - A document whose parent is missing or is itself groups at root level.

use crate::model::document::{Document, DocumentId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Orders two siblings: `order` ascending with missing last, then title
/// case-insensitively, then title ordinally.
///
/// Equal results keep input position because callers sort stably.
pub fn compare_siblings(left: &Document, right: &Document) -> Ordering {
    compare_order(left.order, right.order).then_with(|| compare_titles(&left.title, &right.title))
}

fn compare_order(left: Option<i64>, right: Option<i64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_titles(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Read-only view over a flat collection, grouped by effective parent.
pub(crate) struct SiblingIndex<'a> {
    by_id: HashMap<&'a DocumentId, &'a Document>,
    groups: BTreeMap<Option<DocumentId>, Vec<&'a Document>>,
}

impl<'a> SiblingIndex<'a> {
    pub(crate) fn new(documents: &'a [Document]) -> Self {
        let mut by_id = HashMap::with_capacity(documents.len());
        for document in documents {
            by_id.entry(&document.id).or_insert(document);
        }

        let mut groups: BTreeMap<Option<DocumentId>, Vec<&'a Document>> = BTreeMap::new();
        for document in documents {
            let parent = effective_parent_in(&by_id, document).cloned();
            groups.entry(parent).or_default().push(document);
        }
        for siblings in groups.values_mut() {
            siblings.sort_by(|left, right| compare_siblings(left, right));
        }

        Self { by_id, groups }
    }

    pub(crate) fn get(&self, id: &DocumentId) -> Option<&'a Document> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn contains(&self, id: &DocumentId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Parent used for display and grouping. Dangling and self references
    /// degrade to root.
    pub(crate) fn effective_parent(&self, document: &Document) -> Option<&'a DocumentId> {
        effective_parent_in(&self.by_id, document)
    }

    /// Children of `parent` in display order.
    pub(crate) fn children(&self, parent: Option<&DocumentId>) -> &[&'a Document] {
        self.groups
            .get(&parent.cloned())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every sibling group, root group first.
    pub(crate) fn groups(&self) -> impl Iterator<Item = (Option<&DocumentId>, &[&'a Document])> {
        self.groups
            .iter()
            .map(|(parent, siblings)| (parent.as_ref(), siblings.as_slice()))
    }
}

fn effective_parent_in<'a>(
    by_id: &HashMap<&'a DocumentId, &'a Document>,
    document: &Document,
) -> Option<&'a DocumentId> {
    let parent_id = document.parent_id.as_ref()?;
    if *parent_id == document.id {
        return None;
    }
    by_id.get_key_value(parent_id).map(|(key, _)| *key)
}
