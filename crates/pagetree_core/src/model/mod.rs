//! Flat document model shared by every core operation.
//!
//! # Responsibility
//! - Define the document record and the patch shape handed back to hosts.
//!
//! # Invariants
//! - Core operations read documents and emit patches; they never mutate
//!   the caller's collection.

pub mod document;
pub mod patch;
