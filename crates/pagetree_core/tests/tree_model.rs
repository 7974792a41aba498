use pagetree_core::{build_tree, collect_descendant_ids, flatten, Document, DocumentId};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{HashMap, HashSet};

fn doc_id(position: usize) -> DocumentId {
    DocumentId::new(format!("d{position}"))
}

/// Acyclic collections: every parent has a smaller position than its child.
fn acyclic_collection() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(
        (
            any::<Index>(),
            any::<bool>(),
            prop::option::of(0i64..6),
            "[a-cA-C]{0,2}",
        ),
        1..30,
    )
    .prop_map(|rows| {
        let mut docs: Vec<Document> = rows
            .into_iter()
            .enumerate()
            .map(|(position, (parent_pick, at_root, order, title))| {
                let mut doc = Document::new(doc_id(position), title);
                if position > 0 && !at_root {
                    doc.parent_id = Some(doc_id(parent_pick.index(position)));
                }
                doc.order = order;
                doc
            })
            .collect();
        docs.reverse();
        docs
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn build_then_flatten_keeps_every_document_once_parent_first(docs in acyclic_collection()) {
        let flat = flatten(&build_tree(&docs, None));
        prop_assert_eq!(flat.len(), docs.len());

        let positions: HashMap<&DocumentId, usize> = flat
            .iter()
            .enumerate()
            .map(|(position, doc)| (&doc.id, position))
            .collect();
        prop_assert_eq!(positions.len(), docs.len());

        for doc in &flat {
            if let Some(parent_id) = &doc.parent_id {
                prop_assert!(positions[parent_id] < positions[&doc.id]);
            }
        }
    }

    #[test]
    fn build_tree_is_deterministic(docs in acyclic_collection()) {
        prop_assert_eq!(build_tree(&docs, None), build_tree(&docs, None));
    }

    #[test]
    fn descendants_match_subtree_contents(docs in acyclic_collection(), pick in any::<Index>()) {
        let target = &docs[pick.index(docs.len())].id;
        let from_set = collect_descendant_ids(target, &docs);
        let from_tree: HashSet<DocumentId> = flatten(&build_tree(&docs, Some(target)))
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        prop_assert!(!from_set.contains(target));
        prop_assert_eq!(from_set.into_iter().collect::<HashSet<_>>(), from_tree);
    }
}

#[test]
fn injected_cycle_terminates_and_keeps_both_nodes() {
    let docs = vec![
        Document::new("root", "Root").with_order(0),
        Document::new("A", "A").with_parent("B").with_order(0),
        Document::new("B", "B").with_parent("A").with_order(0),
        Document::new("child", "Child").with_parent("root").with_order(0),
    ];

    let flat = flatten(&build_tree(&docs, None));
    let ids: Vec<&str> = flat.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(ids.iter().filter(|id| **id == "A").count(), 1);
    assert_eq!(ids.iter().filter(|id| **id == "B").count(), 1);
    assert_eq!(&ids[..2], &["root", "child"]);
}

#[test]
fn title_breaks_order_ties_and_missing_order_sorts_last() {
    let docs = vec![
        Document::new("n", "aardvark"),
        Document::new("z", "zebra").with_order(1),
        Document::new("b", "Bravo").with_order(1),
        Document::new("a", "alpha").with_order(1),
        Document::new("first", "Last title").with_order(0),
    ];
    let forest = build_tree(&docs, None);
    let ids: Vec<&str> = forest.iter().map(|node| node.id().as_str()).collect();
    assert_eq!(ids, vec!["first", "a", "b", "z", "n"]);
}

#[test]
fn untitled_fallback_is_display_only() {
    let docs = vec![Document::new("a", "")];
    let forest = build_tree(&docs, None);
    assert_eq!(forest[0].document.display_title(), "Untitled");
    assert_eq!(forest[0].document.title, "");
}
