//! Batch document writes.
//!
//! # Responsibility
//! - Assign ids to documents that arrive without `_id`.
//! - Commit each document independently and report per-item outcomes.
//!
//! # Invariants
//! - Outcomes are returned in input order, one per input document.
//! - A document-level failure (validation, conflict) never prevents later
//!   documents from being written.
//! - A store-level failure aborts the batch; earlier commits stay committed.

use crate::model::document::{DocId, Document};
use crate::repo::document_store::{RepoResult, SqliteDocumentStore, WriteResult};
use log::{error, info, warn};
use serde::Serialize;
use std::borrow::Cow;
use std::time::Instant;
use uuid::Uuid;

/// Per-document result of a bulk write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BulkOutcome {
    Written(WriteResult),
    Rejected {
        id: DocId,
        error: String,
        reason: String,
    },
}

impl BulkOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Written(result) => result.id.as_str(),
            Self::Rejected { id, .. } => id.as_str(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Writes ordered batches through a SQLite document store.
pub struct BulkWriter<'store, 'conn> {
    store: &'store SqliteDocumentStore<'conn>,
}

impl<'store, 'conn> BulkWriter<'store, 'conn> {
    pub fn new(store: &'store SqliteDocumentStore<'conn>) -> Self {
        Self { store }
    }

    /// Writes `documents` in order.
    ///
    /// # Errors
    /// Returns the first store-level error (SQLite transport, corrupt data).
    pub fn write(&self, documents: &[Document]) -> RepoResult<Vec<BulkOutcome>> {
        let started_at = Instant::now();
        info!(
            "event=bulk_docs module=repo status=start batch_size={}",
            documents.len()
        );

        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents {
            let document = with_assigned_id(document);
            match self.store.write_document(&document) {
                Ok(result) => outcomes.push(BulkOutcome::Written(result)),
                Err(err) if err.is_document_level() => {
                    warn!(
                        "event=bulk_docs module=repo status=item_rejected doc_id={} error_code={}",
                        document.id_or_empty(),
                        err.error_code()
                    );
                    outcomes.push(BulkOutcome::Rejected {
                        id: document.id_or_empty().to_string(),
                        error: err.error_code().to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    error!(
                        "event=bulk_docs module=repo status=error duration_ms={} committed={} error_code={} error={}",
                        started_at.elapsed().as_millis(),
                        outcomes.iter().filter(|outcome| outcome.is_ok()).count(),
                        err.error_code(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        let written = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        info!(
            "event=bulk_docs module=repo status=ok duration_ms={} written={} rejected={}",
            started_at.elapsed().as_millis(),
            written,
            outcomes.len() - written
        );
        Ok(outcomes)
    }
}

fn with_assigned_id(document: &Document) -> Cow<'_, Document> {
    if document.id.is_some() {
        return Cow::Borrowed(document);
    }
    let mut owned = document.clone();
    owned.id = Some(Uuid::new_v4().simple().to_string());
    Cow::Owned(owned)
}

#[cfg(test)]
mod tests {
    use super::with_assigned_id;
    use crate::model::document::Document;
    use std::borrow::Cow;

    #[test]
    fn with_assigned_id_keeps_existing_id_borrowed() {
        let doc = Document::new("kept");
        assert!(matches!(with_assigned_id(&doc), Cow::Borrowed(_)));
    }

    #[test]
    fn with_assigned_id_generates_distinct_ids() {
        let doc = Document::without_id().with_field("name", "anon");
        let first = with_assigned_id(&doc).into_owned();
        let second = with_assigned_id(&doc).into_owned();
        assert_eq!(first.id.as_ref().map(String::len), Some(32));
        assert_ne!(first.id, second.id);
        assert_eq!(first.field("name"), doc.field("name"));
    }
}
