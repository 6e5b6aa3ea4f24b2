//! Dinosaur facts shown by the demo list widget.

use crate::model::document::Document;
use serde_json::{json, Value};

/// Id of the scores record written after the dinosaur batch.
pub const SCORES_DOC_ID: &str = "scores";

/// Ordered seed payload: a bulk batch followed by one single put.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub bulk: Vec<Document>,
    pub single: Document,
}

impl SeedData {
    /// The six dinosaur records plus the scores record.
    pub fn dinosaur_facts() -> Self {
        Self {
            bulk: dinos(),
            single: scores(),
        }
    }
}

/// The six `dino-*` records, in insertion order.
pub fn dinos() -> Vec<Document> {
    vec![
        record(
            "dino-bruhathkayosaurus",
            [
                ("name", json!("Bruhathkayosaurus")),
                ("appeared", json!(-70_000_000)),
                ("height", json!(25)),
                ("length", json!(44)),
                ("order", json!("saurischia")),
                ("vanished", json!(-70_000_000)),
                ("weight", json!(135_000)),
            ],
        ),
        record(
            "dino-lambeosaurus",
            [
                ("name", json!("Lambeosaurus")),
                ("appeared", json!(-76_000_000)),
                ("height", json!(2.1)),
                ("length", json!(12.5)),
                ("order", json!("ornithischia")),
                ("vanished", json!(-75_000_000)),
                ("weight", json!(5000)),
            ],
        ),
        record(
            "dino-linhenykus",
            [
                ("name", json!("Linhenykus")),
                ("appeared", json!(-85_000_000)),
                ("height", json!(0.6)),
                ("length", json!(1)),
                ("order", json!("theropoda")),
                ("vanished", json!(-75_000_000)),
                ("weight", json!(3)),
            ],
        ),
        record(
            "dino-pterodactyl",
            [
                ("name", json!("Pterodactyl")),
                ("appeared", json!(-150_000_000)),
                ("height", json!(0.6)),
                ("length", json!(0.8)),
                ("order", json!("pterosauria")),
                ("vanished", json!(-148_500_000)),
                ("weight", json!(2)),
            ],
        ),
        record(
            "dino-stegosaurus",
            [
                ("name", json!("Stegosaurus")),
                ("appeared", json!(-155_000_000)),
                ("height", json!(4)),
                ("length", json!(9)),
                ("order", json!("ornithischia")),
                ("vanished", json!(-150_000_000)),
                ("weight", json!(2500)),
            ],
        ),
        record(
            "dino-triceratops",
            [
                ("name", json!("Triceratops")),
                ("appeared", json!(-68_000_000)),
                ("height", json!(3)),
                ("length", json!(8)),
                ("order", json!("ornithischia")),
                ("vanished", json!(-66_000_000)),
                ("weight", json!(11_000)),
            ],
        ),
    ]
}

/// Popularity scores keyed by lowercase dinosaur name.
pub fn scores() -> Document {
    record(
        SCORES_DOC_ID,
        [
            ("bruhathkayosaurus", json!(55)),
            ("lambeosaurus", json!(21)),
            ("linhenykus", json!(80)),
            ("pterodactyl", json!(93)),
            ("stegosaurus", json!(5)),
            ("triceratops", json!(22)),
        ],
    )
}

fn record<const N: usize>(id: &str, fields: [(&str, Value); N]) -> Document {
    fields
        .into_iter()
        .fold(Document::new(id), |doc, (name, value)| doc.with_field(name, value))
}

#[cfg(test)]
mod tests {
    use super::{dinos, scores, SeedData};

    #[test]
    fn every_seed_record_passes_validation() {
        let data = SeedData::dinosaur_facts();
        assert_eq!(data.bulk.len(), 6);
        for doc in data.bulk.iter().chain(std::iter::once(&data.single)) {
            assert_eq!(doc.validate(), Ok(()), "{:?}", doc.id);
        }
    }

    #[test]
    fn every_dino_carries_all_fact_fields() {
        const FACTS: [&str; 7] = [
            "name", "appeared", "height", "length", "order", "vanished", "weight",
        ];
        for dino in dinos() {
            assert_eq!(dino.fields.len(), FACTS.len(), "{:?}", dino.id);
            for fact in FACTS {
                assert!(dino.field(fact).is_some(), "{:?} lacks {fact}", dino.id);
            }
        }
        assert_eq!(scores().fields.len(), 6);
    }

    #[test]
    fn every_dino_has_a_score() {
        let scores = scores();
        for dino in dinos() {
            let key = dino.id_or_empty().trim_start_matches("dino-").to_string();
            assert!(scores.field(&key).is_some(), "missing score for {key}");
        }
    }
}
