//! Flat collection <-> ordered forest conversion and descendant queries.
//!
//! # Responsibility
//! - Build the sidebar forest from a flat document collection.
//! - Flatten a forest back into reading order.
//! - Answer descendant and ancestor questions by walking `parent_id`.
//!
//! # Invariants
//! - Output is a pure function of the input collection.
//! - Every walk is bounded by a visited set, so cyclic stored data still
//!   terminates and every document appears at most once.
//! - Walks use explicit stacks or queues; tree depth never grows the call
//!   stack.

use super::siblings::SiblingIndex;
use crate::model::document::{Document, DocumentId};
use log::warn;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// One document plus its ordered children. Rebuilt per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub document: Document,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> &DocumentId {
        &self.document.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack: Vec<&TreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

impl Drop for TreeNode {
    // Drops descendants iteratively.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

struct Frame<S> {
    source: S,
    pending: std::vec::IntoIter<S>,
    built: Vec<TreeNode>,
}

/// Assembles nodes bottom-up from `roots` with an explicit stack.
///
/// `children_of` yields a source's children in display order and
/// `document_of` produces the document stored on its node.
pub(crate) fn assemble_forest<S>(
    roots: Vec<S>,
    mut children_of: impl FnMut(&S) -> Vec<S>,
    mut document_of: impl FnMut(&S) -> Document,
) -> Vec<TreeNode> {
    let mut forest = Vec::with_capacity(roots.len());
    for root in roots {
        let pending = children_of(&root).into_iter();
        let mut stack = vec![Frame {
            source: root,
            pending,
            built: Vec::new(),
        }];
        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if let Some(child) = frame.pending.next() {
                let pending = children_of(&child).into_iter();
                stack.push(Frame {
                    source: child,
                    pending,
                    built: Vec::new(),
                });
                continue;
            }
            let Some(done) = stack.pop() else {
                break;
            };
            let node = TreeNode {
                document: document_of(&done.source),
                children: done.built,
            };
            match stack.last_mut() {
                Some(parent) => parent.built.push(node),
                None => forest.push(node),
            }
        }
    }
    forest
}

/// Builds the ordered forest below `root_parent_id` (`None` = whole tree).
///
/// For the whole tree, documents trapped in a stored `parent_id` cycle are
/// surfaced as extra roots after the regular ones, anchored at the point
/// where the cycle closes.
pub fn build_tree(documents: &[Document], root_parent_id: Option<&DocumentId>) -> Vec<TreeNode> {
    let index = SiblingIndex::new(documents);
    let mut seen: HashSet<&DocumentId> = HashSet::new();
    if let Some(root) = root_parent_id.and_then(|id| index.get(id)) {
        seen.insert(&root.id);
    }

    let mut forest = build_level(&index, root_parent_id, &mut seen);
    if root_parent_id.is_some() {
        return forest;
    }

    for document in documents {
        if seen.contains(&document.id) {
            continue;
        }
        let anchor = cycle_anchor(&index, document);
        if !seen.insert(&anchor.id) {
            continue;
        }
        warn!(
            "event=tree_build module=tree status=cycle_broken anchor_id={}",
            anchor.id
        );
        forest.push(TreeNode {
            document: anchor.clone(),
            children: build_level(&index, Some(&anchor.id), &mut seen),
        });
    }
    forest
}

fn build_level<'a>(
    index: &SiblingIndex<'a>,
    parent: Option<&DocumentId>,
    seen: &mut HashSet<&'a DocumentId>,
) -> Vec<TreeNode> {
    let roots = unseen_children(index, parent, seen);
    assemble_forest(
        roots,
        |&document| unseen_children(index, Some(&document.id), seen),
        |&document| document.clone(),
    )
}

/// Children of `parent` not placed yet; marks them placed.
fn unseen_children<'a>(
    index: &SiblingIndex<'a>,
    parent: Option<&DocumentId>,
    seen: &mut HashSet<&'a DocumentId>,
) -> Vec<&'a Document> {
    index
        .children(parent)
        .iter()
        .copied()
        .filter(|&child| seen.insert(&child.id))
        .collect()
}

/// Walks up from `document` and returns the first ancestor revisited,
/// i.e. the node where the stored cycle closes.
fn cycle_anchor<'a>(index: &SiblingIndex<'a>, document: &'a Document) -> &'a Document {
    let mut visited: HashSet<&DocumentId> = HashSet::new();
    let mut cursor = document;
    loop {
        visited.insert(&cursor.id);
        let Some(parent) = index.effective_parent(cursor).and_then(|id| index.get(id)) else {
            return cursor;
        };
        if visited.contains(&parent.id) {
            return parent;
        }
        cursor = parent;
    }
}

/// Pre-order (node, then each child subtree) reading order.
pub fn flatten(forest: &[TreeNode]) -> Vec<Document> {
    let mut ordered = Vec::new();
    let mut stack: Vec<&TreeNode> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        ordered.push(node.document.clone());
        stack.extend(node.children.iter().rev());
    }
    ordered
}

/// Every id transitively below `id`, excluding `id` itself.
pub fn collect_descendant_ids(id: &DocumentId, documents: &[Document]) -> BTreeSet<DocumentId> {
    let index = SiblingIndex::new(documents);
    descendants_in(&index, id)
}

pub(crate) fn descendants_in(index: &SiblingIndex<'_>, id: &DocumentId) -> BTreeSet<DocumentId> {
    let mut found = BTreeSet::new();
    let mut queue: VecDeque<&DocumentId> = VecDeque::from([id]);
    while let Some(current) = queue.pop_front() {
        for child in index.children(Some(current)) {
            if child.id == *id || !found.insert(child.id.clone()) {
                continue;
            }
            queue.push_back(&child.id);
        }
    }
    found
}

/// Parent chain of `id`, nearest first. Empty for roots and unknown ids.
pub fn ancestor_ids(id: &DocumentId, documents: &[Document]) -> Vec<DocumentId> {
    let index = SiblingIndex::new(documents);
    ancestors_in(&index, id)
}

pub(crate) fn ancestors_in(index: &SiblingIndex<'_>, id: &DocumentId) -> Vec<DocumentId> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&DocumentId> = HashSet::from([id]);
    let mut cursor = index.get(id);
    while let Some(parent_id) = cursor.and_then(|doc| index.effective_parent(doc)) {
        if !visited.insert(parent_id) {
            break;
        }
        chain.push(parent_id.clone());
        cursor = index.get(parent_id);
    }
    chain
}

/// Finds the node for `id` anywhere in `forest`.
pub fn find_node<'a>(forest: &'a [TreeNode], id: &DocumentId) -> Option<&'a TreeNode> {
    let mut stack: Vec<&TreeNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id() == id {
            return Some(node);
        }
        stack.extend(node.children.iter());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{ancestor_ids, build_tree, collect_descendant_ids, find_node, flatten};
    use crate::model::document::{Document, DocumentId};

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|doc| doc.id.as_str()).collect()
    }

    fn sample() -> Vec<Document> {
        vec![
            Document::new("c", "Sub").with_parent("a").with_order(0),
            Document::new("b", "Rules").with_order(1),
            Document::new("a", "Intro").with_order(0),
            Document::new("d", "Deep").with_parent("c").with_order(0),
        ]
    }

    #[test]
    fn builds_sorted_forest_and_flattens_in_reading_order() {
        let forest = build_tree(&sample(), None);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].id().as_str(), "a");
        assert_eq!(forest[0].children[0].id().as_str(), "c");
        assert_eq!(ids(&flatten(&forest)), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn subtree_build_starts_below_given_parent() {
        let forest = build_tree(&sample(), Some(&DocumentId::new("a")));
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id().as_str(), "c");
        assert_eq!(forest[0].count(), 2);
    }

    #[test]
    fn dangling_parent_degrades_to_root() {
        let docs = vec![
            Document::new("a", "A").with_order(0),
            Document::new("orphan", "O").with_parent("gone").with_order(0),
        ];
        let forest = build_tree(&docs, None);
        assert_eq!(forest.len(), 2);
        assert_eq!(docs[1].parent_id, Some(DocumentId::new("gone")));
    }

    #[test]
    fn two_node_cycle_terminates_with_each_node_once() {
        let docs = vec![
            Document::new("a", "A").with_parent("b"),
            Document::new("b", "B").with_parent("a"),
            Document::new("r", "Root").with_order(0),
        ];
        let forest = build_tree(&docs, None);
        let flat = flatten(&forest);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.iter().filter(|d| d.id.as_str() == "a").count(), 1);
        assert_eq!(flat.iter().filter(|d| d.id.as_str() == "b").count(), 1);
        assert_eq!(forest[0].id().as_str(), "r");
    }

    #[test]
    fn cycle_with_tail_anchors_at_cycle_member() {
        let docs = vec![
            Document::new("tail", "Tail").with_parent("a"),
            Document::new("a", "A").with_parent("b"),
            Document::new("b", "B").with_parent("a"),
        ];
        let forest = build_tree(&docs, None);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id().as_str(), "a");
        assert_eq!(forest[0].count(), 3);
    }

    #[test]
    fn deep_chain_builds_without_recursion() {
        let depth = 20_000;
        let docs: Vec<Document> = (0..depth)
            .map(|level| {
                let doc = Document::new(format!("d{level}"), format!("Level {level}")).with_order(0);
                if level == 0 {
                    doc
                } else {
                    doc.with_parent(format!("d{}", level - 1))
                }
            })
            .collect();

        let forest = build_tree(&docs, None);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].count(), depth);

        let flat = flatten(&forest);
        assert_eq!(flat.len(), depth);
        assert_eq!(flat[depth - 1].id.as_str(), "d19999");
        assert!(find_node(&forest, &DocumentId::new("d19999")).unwrap().is_leaf());
        assert_eq!(ancestor_ids(&DocumentId::new("d19999"), &docs).len(), depth - 1);
    }

    #[test]
    fn flatten_is_repeatable() {
        let forest = build_tree(&sample(), None);
        assert_eq!(flatten(&forest), flatten(&forest));
    }

    #[test]
    fn descendants_exclude_self_and_tolerate_cycles() {
        let set = collect_descendant_ids(&DocumentId::new("a"), &sample());
        let listed: Vec<&str> = set.iter().map(DocumentId::as_str).collect();
        assert_eq!(listed, vec!["c", "d"]);

        let cyclic = vec![
            Document::new("a", "A").with_parent("b"),
            Document::new("b", "B").with_parent("a"),
        ];
        let set = collect_descendant_ids(&DocumentId::new("a"), &cyclic);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&DocumentId::new("b")));
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let chain = ancestor_ids(&DocumentId::new("d"), &sample());
        assert_eq!(chain, vec![DocumentId::new("c"), DocumentId::new("a")]);
        assert!(ancestor_ids(&DocumentId::new("b"), &sample()).is_empty());
    }

    #[test]
    fn find_node_reaches_nested_nodes() {
        let forest = build_tree(&sample(), None);
        let found = find_node(&forest, &DocumentId::new("d")).unwrap();
        assert!(found.is_leaf());
        assert!(find_node(&forest, &DocumentId::new("zz")).is_none());
    }
}
