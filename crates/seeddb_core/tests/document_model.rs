use seeddb_core::{Document, DocumentValidationError};
use serde_json::json;

#[test]
fn document_serializes_flat_with_underscore_metadata() {
    let doc = Document::new("dino-stegosaurus")
        .with_rev("2-0123456789abcdef0123456789abcdef")
        .with_field("name", "Stegosaurus")
        .with_field("weight", 2500);

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json,
        json!({
            "_id": "dino-stegosaurus",
            "_rev": "2-0123456789abcdef0123456789abcdef",
            "name": "Stegosaurus",
            "weight": 2500
        })
    );

    let decoded: Document = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn document_without_id_omits_metadata_fields() {
    let json = serde_json::to_value(Document::without_id().with_field("a", 1)).unwrap();
    assert_eq!(json, json!({"a": 1}));
}

#[test]
fn from_json_reads_metadata_and_fields() {
    let doc = Document::from_json(json!({
        "_id": "scores",
        "triceratops": 22
    }))
    .unwrap();

    assert_eq!(doc.id.as_deref(), Some("scores"));
    assert_eq!(doc.rev, None);
    assert_eq!(doc.field("triceratops"), Some(&json!(22)));
    assert_eq!(doc.validate(), Ok(()));
}

#[test]
fn validation_errors_have_readable_messages() {
    assert_eq!(
        DocumentValidationError::ReservedId("_design".to_string()).to_string(),
        "document id `_design` uses reserved `_` prefix"
    );
    assert_eq!(
        DocumentValidationError::MissingId.to_string(),
        "document is missing `_id`"
    );
}
