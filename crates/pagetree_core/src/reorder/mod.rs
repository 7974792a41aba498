//! Reparent/reorder engine.
//!
//! # Responsibility
//! - Turn move and delete requests into patch sets over a snapshot.
//! - Normalize sibling orders to contiguous `0..n` ranges.
//!
//! # Invariants
//! - The engine never applies anything; hosts persist the full patch set
//!   and refresh their snapshot before the next request.
//! - Sibling positions follow `tree::siblings::compare_siblings`.

pub mod delete_plan;
pub mod move_plan;
pub mod normalize;
