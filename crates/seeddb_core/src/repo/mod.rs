//! Repository layer: document persistence and batch writes.
//!
//! # Responsibility
//! - Define the storage contract used by seeding and other callers.
//! - Isolate SQLite query details from seed orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Document::validate()` before persistence.
//! - Repository APIs return semantic errors (`Conflict`) in addition to DB
//!   transport errors.

pub mod bulk_writer;
pub mod document_store;
