//! Document domain model.
//!
//! # Responsibility
//! - Define the flat record the host hands to every core operation.
//! - Provide display helpers that never rewrite stored values.
//!
//! # Invariants
//! - `id` is issued by the document store and never reassigned.
//! - `parent_id == None` means root level.
//! - `order == None` sorts after every defined order in its sibling group.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Label shown for documents whose stored title is blank.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Opaque, store-issued document identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Issues a fresh random identifier.
    ///
    /// Used by in-process stores; external stores bring their own ids.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One page in the workspace, as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    /// Stored title. May be empty; see [`Document::display_title`].
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<DocumentId>,
    /// Sibling sort key. Not required to be contiguous on input.
    #[serde(default)]
    pub order: Option<i64>,
    /// Content body, icon, timestamps and anything else the core ignores.
    #[serde(flatten)]
    pub payload: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a root-level document without an order key.
    pub fn new(id: impl Into<DocumentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_id: None,
            order: None,
            payload: BTreeMap::new(),
        }
    }

    /// Sets the parent reference.
    pub fn with_parent(mut self, parent_id: impl Into<DocumentId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the sibling order key.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the title to render, falling back to [`UNTITLED_LABEL`].
    pub fn display_title(&self) -> &str {
        self.display_title_or(UNTITLED_LABEL)
    }

    /// Returns the title to render, falling back to a caller-chosen label.
    pub fn display_title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            fallback
        } else {
            trimmed
        }
    }

    /// Returns whether this document sits at root level as stored.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
