//! Document store abstraction.
//!
//! # Responsibility
//! - Define the store contract hosts implement for the tree service.
//! - Ship an in-memory store; persistence engines live in hosts.

pub mod document_repo;
