//! Core use-case services.
//!
//! # Responsibility
//! - Sequence store reads, engine planning and store writes.
//! - Keep hosts decoupled from planning details.

pub mod tree_service;
