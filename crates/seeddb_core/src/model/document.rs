//! Schema-less document record.
//!
//! # Responsibility
//! - Hold `_id`/`_rev` metadata next to arbitrary JSON fields.
//! - Enforce the few structural rules the store relies on.
//!
//! # Invariants
//! - `_id` must be non-empty and must not use the reserved `_` prefix.
//! - Top-level fields other than `_id`/`_rev` must not start with `_`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Document identifier as stored in `_id`.
pub type DocId = String;

const RESERVED_PREFIX: char = '_';

/// Structural validation failures for document writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// The document has no `_id` and the write path does not assign one.
    MissingId,
    /// `_id` is present but empty.
    EmptyId,
    /// `_id` starts with the reserved `_` prefix.
    ReservedId(DocId),
    /// A top-level field other than `_id`/`_rev` starts with `_`.
    BadSpecialMember(String),
    /// The JSON value is not an object.
    NotAnObject,
    /// `_id`/`_rev` has the wrong JSON type; carries the decoder message.
    InvalidMember(String),
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "document is missing `_id`"),
            Self::EmptyId => write!(f, "document `_id` must not be empty"),
            Self::ReservedId(id) => write!(f, "document id `{id}` uses reserved `_` prefix"),
            Self::BadSpecialMember(name) => {
                write!(f, "bad special document member `{name}`")
            }
            Self::NotAnObject => write!(f, "document must be a JSON object"),
            Self::InvalidMember(message) => write!(f, "invalid document member: {message}"),
        }
    }
}

impl Error for DocumentValidationError {}

/// One record in the store.
///
/// Serializes flat, the way documents travel on the wire:
/// `{"_id": "...", "_rev": "...", "name": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocId>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Creates an empty document with the given id.
    pub fn new(id: impl Into<DocId>) -> Self {
        Self {
            id: Some(id.into()),
            rev: None,
            fields: Map::new(),
        }
    }

    /// Creates an empty document whose id is assigned on bulk insert.
    pub fn without_id() -> Self {
        Self {
            id: None,
            rev: None,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style revision setter, used when updating an existing document.
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// Decodes a document from a JSON object value.
    pub fn from_json(value: Value) -> Result<Self, DocumentValidationError> {
        if !value.is_object() {
            return Err(DocumentValidationError::NotAnObject);
        }
        serde_json::from_value(value)
            .map_err(|err| DocumentValidationError::InvalidMember(err.to_string()))
    }

    /// Returns one top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the id, or an empty string for documents awaiting assignment.
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Validates structural rules required before persistence.
    ///
    /// # Errors
    /// - `MissingId` / `EmptyId` / `ReservedId` for identifier problems.
    /// - `BadSpecialMember` for `_`-prefixed data fields.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        let id = self.id.as_deref().ok_or(DocumentValidationError::MissingId)?;
        if id.is_empty() {
            return Err(DocumentValidationError::EmptyId);
        }
        if id.starts_with(RESERVED_PREFIX) {
            return Err(DocumentValidationError::ReservedId(id.to_string()));
        }
        if let Some(name) = self
            .fields
            .keys()
            .find(|name| name.starts_with(RESERVED_PREFIX))
        {
            return Err(DocumentValidationError::BadSpecialMember(name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentValidationError};
    use serde_json::json;

    #[test]
    fn validate_accepts_plain_document() {
        let doc = Document::new("dino-a").with_field("name", "A");
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_identifier_problems() {
        assert_eq!(
            Document::without_id().validate(),
            Err(DocumentValidationError::MissingId)
        );
        assert_eq!(
            Document::new("").validate(),
            Err(DocumentValidationError::EmptyId)
        );
        assert_eq!(
            Document::new("_hidden").validate(),
            Err(DocumentValidationError::ReservedId("_hidden".to_string()))
        );
    }

    #[test]
    fn from_json_keeps_unknown_underscore_members_for_validation() {
        let doc = Document::from_json(json!({"_id": "x", "_deleted": true})).unwrap();
        assert_eq!(
            doc.validate(),
            Err(DocumentValidationError::BadSpecialMember("_deleted".to_string()))
        );
    }

    #[test]
    fn from_json_reports_mistyped_id() {
        let err = Document::from_json(json!({"_id": 5})).unwrap_err();
        assert!(matches!(err, DocumentValidationError::InvalidMember(_)));
        assert!(err.to_string().starts_with("invalid document member"));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert_eq!(
            Document::from_json(json!([1, 2])).unwrap_err(),
            DocumentValidationError::NotAnObject
        );
    }
}
