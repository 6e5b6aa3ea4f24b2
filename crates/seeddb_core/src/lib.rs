//! Local document store with guarded demo seeding.
//!
//! The store keeps schema-less JSON documents in SQLite, tracks a monotonic
//! update sequence, and exposes `info`/`get`/`put`/`bulk_docs`/`all_docs`.
//! [`SeedGuard`] uses the update sequence as an emptiness probe and writes
//! the dinosaur-facts data set into a store that was never written.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;

pub use config::{ConfigError, SeedConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DocId, Document, DocumentValidationError};
pub use model::revision::Revision;
pub use repo::bulk_writer::{BulkOutcome, BulkWriter};
pub use repo::document_store::{
    DbInfo, DocumentStore, RepoError, RepoResult, SqliteDocumentStore, WriteResult,
};
pub use seed::demo_data::{SeedData, SCORES_DOC_ID};
pub use seed::guard::{
    ErrorSink, LogErrorSink, SeedError, SeedGuard, SeedOutcome, SeedResult, SeedState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
