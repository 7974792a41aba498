use pagetree_core::{
    build_tree, filter_forest, search_documents, Document, DocumentId, ExpansionState,
};

fn id(value: &str) -> DocumentId {
    DocumentId::new(value)
}

fn three_level_chain() -> Vec<Document> {
    vec![
        Document::new("root", "Company").with_order(0),
        Document::new("mid", "Engineering").with_parent("root").with_order(0),
        Document::new("leaf", "On-call Runbook").with_parent("mid").with_order(0),
        Document::new("side", "Holidays").with_parent("root").with_order(1),
    ]
}

#[test]
fn leaf_match_forces_ancestors_open() {
    let outcome = search_documents(&three_level_chain(), "RUNBOOK")
        .unwrap()
        .expect("non-blank query filters");

    assert_eq!(outcome.matched_ids.len(), 1);
    assert!(outcome.matched_ids.contains(&id("leaf")));
    assert!(outcome.expanded_ids.contains(&id("root")));
    assert!(outcome.expanded_ids.contains(&id("mid")));
    assert!(!outcome.expanded_ids.contains(&id("leaf")));
}

#[test]
fn no_filter_and_no_results_are_distinct() {
    let docs = three_level_chain();
    assert!(search_documents(&docs, "").unwrap().is_none());
    assert!(search_documents(&docs, " \t ").unwrap().is_none());

    let outcome = search_documents(&docs, "payroll").unwrap().unwrap();
    assert!(outcome.is_empty());
    assert!(outcome.expanded_ids.is_empty());
}

#[test]
fn nested_matches_expand_matching_ancestors_too() {
    let docs = vec![
        Document::new("a", "Plans").with_order(0),
        Document::new("b", "Plans 2025").with_parent("a").with_order(0),
    ];
    let outcome = search_documents(&docs, "plans").unwrap().unwrap();
    assert_eq!(outcome.matched_ids.len(), 2);
    assert_eq!(
        outcome.expanded_ids.iter().collect::<Vec<_>>(),
        vec![&id("a")]
    );
}

#[test]
fn filtered_view_with_user_state_round_trip() {
    let docs = three_level_chain();
    let mut state = ExpansionState::new();
    state.expand(id("side"));

    let outcome = search_documents(&docs, "on-call").unwrap().unwrap();
    let open = state.effective(Some(&outcome));
    assert!(open.contains(&id("side")));
    assert!(open.contains(&id("root")));
    assert!(open.contains(&id("mid")));

    let filtered = filter_forest(&build_tree(&docs, None), &outcome);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].children.len(), 1);
    assert_eq!(filtered[0].children[0].children[0].id(), &id("leaf"));

    assert_eq!(state.effective(None).len(), 1);
}
