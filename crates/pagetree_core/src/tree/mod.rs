//! Tree model over the flat document collection.
//!
//! # Responsibility
//! - Convert between the flat collection and the ordered forest view.
//! - Provide descendant/ancestor primitives used by moves, deletes and
//!   search expansion.
//! - Diagnose stored inconsistencies without repairing them.
//!
//! # Invariants
//! - Ancestor lookups walk `parent_id` on the flat collection; tree nodes
//!   carry no parent back-reference.

pub mod check;
pub mod forest;
pub mod siblings;
