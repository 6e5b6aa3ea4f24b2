//! Document revision tags.
//!
//! A revision renders as `<generation>-<32 hex chars>`. Generation starts at
//! 1 for a fresh insert and grows by one per accepted overwrite.

use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub generation: u64,
    pub hash: String,
}

impl Revision {
    /// Revision for the first write of a document.
    pub fn first() -> Self {
        Self::with_generation(1)
    }

    /// Revision that supersedes `self`; `None` once the generation is exhausted.
    pub fn next(&self) -> Option<Self> {
        self.generation.checked_add(1).map(Self::with_generation)
    }

    /// Parses `<generation>-<hash>`; returns `None` for malformed tags.
    pub fn parse(value: &str) -> Option<Self> {
        let (generation, hash) = value.split_once('-')?;
        let generation = generation
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)?;
        if hash.is_empty() {
            return None;
        }
        Some(Self {
            generation,
            hash: hash.to_string(),
        })
    }

    fn with_generation(generation: u64) -> Self {
        Self {
            generation,
            hash: Uuid::new_v4().simple().to_string(),
        }
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.generation, self.hash)
    }
}
