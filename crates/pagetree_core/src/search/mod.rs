//! Title search and sidebar expansion state.
//!
//! # Responsibility
//! - Match documents by title and compute which ancestors must be forced
//!   open so every match stays visible.
//! - Hold user expand/collapse state as an explicit value.

pub mod expansion;
pub mod title;
