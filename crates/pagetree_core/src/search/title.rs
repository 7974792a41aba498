//! Case-insensitive title search over the flat collection.
//!
//! # Responsibility
//! - Decide between "no filter" and "filter with possibly zero matches".
//! - Return match ids and the ancestor ids that must be expanded.
//!
//! # Invariants
//! - Blank queries never filter.
//! - Matches are not added to the expansion set unless they are also an
//!   ancestor of another match.
//! - Ancestor walks are bounded, so cyclic stored data terminates.

use crate::model::document::{Document, DocumentId};
use crate::tree::forest::{ancestors_in, assemble_forest, TreeNode};
use crate::tree::siblings::SiblingIndex;
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    /// Query text cannot be compiled into a matcher (e.g. too large).
    InvalidQuery { query: String, message: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid title query `{query}`: {message}")
            }
        }
    }
}

impl Error for SearchError {}

/// Compiled, non-blank title query.
#[derive(Debug, Clone)]
pub struct TitleQuery {
    text: String,
    matcher: Regex,
}

impl TitleQuery {
    /// Compiles `query` as a literal, case-insensitive substring matcher.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    pub fn parse(query: &str) -> SearchResult<Option<Self>> {
        let text = query.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let matcher = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .map_err(|err| SearchError::InvalidQuery {
                query: text.to_string(),
                message: err.to_string(),
            })?;
        Ok(Some(Self {
            text: text.to_string(),
            matcher,
        }))
    }

    /// Trimmed query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, title: &str) -> bool {
        self.matcher.is_match(title.trim())
    }
}

/// Matches plus the ancestors that must be forced open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub matched_ids: BTreeSet<DocumentId>,
    pub expanded_ids: BTreeSet<DocumentId>,
}

impl SearchOutcome {
    /// True when a real query found nothing ("no results").
    pub fn is_empty(&self) -> bool {
        self.matched_ids.is_empty()
    }

    /// Whether `id` stays visible in the filtered view.
    pub fn is_visible(&self, id: &DocumentId) -> bool {
        self.matched_ids.contains(id) || self.expanded_ids.contains(id)
    }
}

/// Runs `query` over `documents`.
///
/// Returns `Ok(None)` when the query is blank, meaning "show everything".
pub fn search_documents(
    documents: &[Document],
    query: &str,
) -> SearchResult<Option<SearchOutcome>> {
    let Some(query) = TitleQuery::parse(query)? else {
        return Ok(None);
    };

    let index = SiblingIndex::new(documents);
    let mut outcome = SearchOutcome::default();
    for document in documents {
        if !query.matches(&document.title) {
            continue;
        }
        outcome.matched_ids.insert(document.id.clone());
        outcome
            .expanded_ids
            .extend(ancestors_in(&index, &document.id));
    }

    debug!(
        "event=title_search module=search status=ok matches={} expanded={}",
        outcome.matched_ids.len(),
        outcome.expanded_ids.len()
    );
    Ok(Some(outcome))
}

/// Prunes `forest` to matches and their ancestors, keeping order.
pub fn filter_forest(forest: &[TreeNode], outcome: &SearchOutcome) -> Vec<TreeNode> {
    assemble_forest(
        visible_nodes(forest, outcome),
        |&node| visible_nodes(&node.children, outcome),
        |&node| node.document.clone(),
    )
}

fn visible_nodes<'f>(nodes: &'f [TreeNode], outcome: &SearchOutcome) -> Vec<&'f TreeNode> {
    nodes
        .iter()
        .filter(|node| outcome.is_visible(node.id()))
        .collect()
}
