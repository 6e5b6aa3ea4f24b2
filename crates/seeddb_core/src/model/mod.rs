//! Document model shared by the store, bulk writer and seed guard.
//!
//! # Invariants
//! - Every stored document is identified by a non-empty `_id`.
//! - `_rev` is assigned by the store, never by callers creating documents.

pub mod document;
pub mod revision;
