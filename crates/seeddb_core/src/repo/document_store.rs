//! Document store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide `info`/`get`/`put`/`all_docs` over the `documents` table.
//! - Advance the store update sequence once per committed document write.
//!
//! # Invariants
//! - Write paths must call `Document::validate()` before SQL mutations.
//! - Every committed write inserts exactly one `changes` row in the same
//!   transaction as the `documents` row.
//! - `update_seq == 0` iff no write was ever committed.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::document::{DocId, Document, DocumentValidationError};
use crate::model::revision::Revision;
use crate::repo::bulk_writer::{BulkOutcome, BulkWriter};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for document persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DocumentValidationError),
    Db(DbError),
    /// `_rev` did not match the stored revision for this id.
    Conflict(DocId),
    InvalidData(String),
    Serialization(serde_json::Error),
}

impl RepoError {
    /// Short machine-readable code, as reported in bulk outcomes.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "bad_request",
            Self::Db(_) => "db_error",
            Self::Conflict(_) => "conflict",
            Self::InvalidData(_) => "invalid_data",
            Self::Serialization(_) => "bad_request",
        }
    }

    /// Whether the failure belongs to one document rather than the store.
    ///
    /// Document-level failures are reported per item by bulk writes;
    /// store-level failures abort the call.
    pub fn is_document_level(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::Serialization(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict(id) => write!(f, "document update conflict: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document data: {message}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Conflict(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DocumentValidationError> for RepoError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Store metadata returned by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbInfo {
    pub db_name: String,
    pub doc_count: u64,
    pub update_seq: u64,
}

/// Successful write acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub ok: bool,
    pub id: DocId,
    pub rev: String,
}

/// Storage contract used by the seed guard and other callers.
pub trait DocumentStore {
    /// Reads store metadata. Has no side effects.
    fn info(&self) -> RepoResult<DbInfo>;
    /// Reads one document by id with `_id`/`_rev` populated.
    fn get(&self, id: &str) -> RepoResult<Option<Document>>;
    /// Inserts or overwrites one document; requires `_id`.
    fn put(&self, document: &Document) -> RepoResult<WriteResult>;
    /// Writes a batch, committing each document independently.
    fn bulk_docs(&self, documents: &[Document]) -> RepoResult<Vec<BulkOutcome>>;
    /// Lists all documents ordered by id.
    fn all_docs(&self) -> RepoResult<Vec<Document>>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn info(&self) -> RepoResult<DbInfo> {
        (**self).info()
    }

    fn get(&self, id: &str) -> RepoResult<Option<Document>> {
        (**self).get(id)
    }

    fn put(&self, document: &Document) -> RepoResult<WriteResult> {
        (**self).put(document)
    }

    fn bulk_docs(&self, documents: &[Document]) -> RepoResult<Vec<BulkOutcome>> {
        (**self).bulk_docs(documents)
    }

    fn all_docs(&self) -> RepoResult<Vec<Document>> {
        (**self).all_docs()
    }
}

/// SQLite-backed document store.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
    db_name: String,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Constructs a store over a migrated connection.
    ///
    /// # Errors
    /// - `InvalidData` when the connection schema is not at the latest version.
    pub fn try_new(conn: &'conn Connection, db_name: impl Into<String>) -> RepoResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self {
            conn,
            db_name: db_name.into(),
        })
    }

    /// Validates and commits one document in its own transaction.
    pub(crate) fn write_document(&self, document: &Document) -> RepoResult<WriteResult> {
        document.validate()?;
        let id = document.id_or_empty();
        let body = serde_json::to_string(&document.fields)?;

        let tx = self.conn.unchecked_transaction()?;
        let stored_rev: Option<String> = tx
            .query_row("SELECT rev FROM documents WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;

        let next_rev = match (stored_rev.as_deref(), document.rev.as_deref()) {
            (None, None) => Revision::first(),
            (Some(stored), Some(given)) if stored == given => Revision::parse(stored)
                .and_then(|current| current.next())
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid revision `{stored}` in documents.rev for `{id}`"
                    ))
                })?,
            _ => {
                warn!(
                    "event=doc_put module=repo status=error doc_id={} error_code=conflict",
                    id
                );
                return Err(RepoError::Conflict(id.to_string()));
            }
        };
        let rev = next_rev.to_string();

        tx.execute(
            "INSERT INTO changes (doc_id, rev) VALUES (?1, ?2);",
            params![id, rev],
        )?;
        let seq = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO documents (id, rev, body, updated_seq)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                rev = excluded.rev,
                body = excluded.body,
                updated_seq = excluded.updated_seq;",
            params![id, rev, body, seq],
        )?;
        tx.commit()?;

        debug!(
            "event=doc_put module=repo status=ok doc_id={} rev_gen={} seq={}",
            id, next_rev.generation, seq
        );

        Ok(WriteResult {
            ok: true,
            id: id.to_string(),
            rev,
        })
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn info(&self) -> RepoResult<DbInfo> {
        let (doc_count, update_seq) = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM documents),
                (SELECT COALESCE(MAX(seq), 0) FROM changes);",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        Ok(DbInfo {
            db_name: self.db_name.clone(),
            doc_count: non_negative(doc_count, "document count")?,
            update_seq: non_negative(update_seq, "update_seq")?,
        })
    }

    fn get(&self, id: &str) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, rev, body FROM documents WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }

        Ok(None)
    }

    fn put(&self, document: &Document) -> RepoResult<WriteResult> {
        self.write_document(document)
    }

    fn bulk_docs(&self, documents: &[Document]) -> RepoResult<Vec<BulkOutcome>> {
        BulkWriter::new(self).write(documents)
    }

    fn all_docs(&self) -> RepoResult<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, rev, body FROM documents ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut documents = Vec::new();

        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }

        Ok(documents)
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> RepoResult<()> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if version != latest_version() {
        return Err(RepoError::InvalidData(format!(
            "connection schema version {version} does not match expected {}; open it with open_db",
            latest_version()
        )));
    }
    Ok(())
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id: String = row.get("id")?;
    let rev: String = row.get("rev")?;
    let body: String = row.get("body")?;

    let fields = match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            return Err(RepoError::InvalidData(format!(
                "body of `{id}` in documents.body is not a JSON object"
            )));
        }
        Err(err) => {
            return Err(RepoError::InvalidData(format!(
                "body of `{id}` in documents.body is not valid JSON: {err}"
            )));
        }
    };

    Ok(Document {
        id: Some(id),
        rev: Some(rev),
        fields,
    })
}

fn non_negative(value: i64, what: &str) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative {what}: {value}")))
}
