//! Guarded seeding of an empty document store.
//!
//! # Responsibility
//! - Probe `info().update_seq` and seed only when it is zero.
//! - Run bulk write then single put as one observable chain.
//! - Route any chain failure to an error sink exactly once.
//!
//! # Invariants
//! - The store is injected; the guard owns no global handle.
//! - A failure after the bulk step is not repaired: `update_seq` is already
//!   non-zero, so later runs report `AlreadySeeded` and skip the put.
//! - A failure before any commit leaves `update_seq == 0`; later runs seed
//!   again.

use crate::repo::bulk_writer::BulkOutcome;
use crate::repo::document_store::{DocumentStore, RepoError, WriteResult};
use crate::seed::demo_data::SeedData;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Seed state derived from the store update sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    Unseeded,
    Seeded,
}

impl SeedState {
    pub fn from_update_seq(update_seq: u64) -> Self {
        if update_seq == 0 {
            Self::Unseeded
        } else {
            Self::Seeded
        }
    }
}

/// Completed guard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and both seed steps ran.
    Seeded {
        bulk: Vec<BulkOutcome>,
        single: WriteResult,
    },
    /// The store had been written before; nothing was written.
    AlreadySeeded { update_seq: u64 },
}

impl SeedOutcome {
    /// Bulk items the store rejected, if seeding ran.
    pub fn rejected(&self) -> impl Iterator<Item = &BulkOutcome> {
        let bulk: &[BulkOutcome] = match self {
            Self::Seeded { bulk, .. } => bulk,
            Self::AlreadySeeded { .. } => &[],
        };
        bulk.iter().filter(|outcome| !outcome.is_ok())
    }
}

/// Failure of one step of the seed chain.
#[derive(Debug)]
pub enum SeedError {
    Info(RepoError),
    BulkWrite(RepoError),
    Put(RepoError),
}

impl SeedError {
    pub fn step(&self) -> &'static str {
        match self {
            Self::Info(_) => "info",
            Self::BulkWrite(_) => "bulk_docs",
            Self::Put(_) => "put",
        }
    }
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info(err) => write!(f, "reading store info failed: {err}"),
            Self::BulkWrite(err) => write!(f, "bulk seed write failed: {err}"),
            Self::Put(err) => write!(f, "seed put failed: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Info(err) | Self::BulkWrite(err) | Self::Put(err) => Some(err),
        }
    }
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Receiver for seed chain failures.
pub trait ErrorSink {
    fn report(&mut self, error: &SeedError);
}

impl<F: FnMut(&SeedError)> ErrorSink for F {
    fn report(&mut self, error: &SeedError) {
        self(error)
    }
}

/// Sink that records failures through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&mut self, error: &SeedError) {
        error!(
            "event=seed_run module=seed status=error step={} error={}",
            error.step(),
            error
        );
    }
}

/// Seeds a store once, when it has never been written.
pub struct SeedGuard<S: DocumentStore> {
    store: S,
    data: SeedData,
}

impl<S: DocumentStore> SeedGuard<S> {
    /// Guard seeding the dinosaur-facts data set.
    pub fn new(store: S) -> Self {
        Self::with_data(store, SeedData::dinosaur_facts())
    }

    pub fn with_data(store: S, data: SeedData) -> Self {
        Self { store, data }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state; a plain read with no side effects.
    pub fn state(&self) -> SeedResult<SeedState> {
        let info = self.store.info().map_err(SeedError::Info)?;
        Ok(SeedState::from_update_seq(info.update_seq))
    }

    /// Runs the chain: info, then (only if empty) bulk write, then put.
    ///
    /// # Errors
    /// Returns the first failing step; later steps do not run.
    pub fn run(&self) -> SeedResult<SeedOutcome> {
        let started_at = Instant::now();
        let info = self.store.info().map_err(SeedError::Info)?;
        info!(
            "event=seed_check module=seed status=ok db_name={} update_seq={} doc_count={}",
            info.db_name, info.update_seq, info.doc_count
        );

        if SeedState::from_update_seq(info.update_seq) == SeedState::Seeded {
            info!(
                "event=seed_run module=seed status=skip update_seq={}",
                info.update_seq
            );
            return Ok(SeedOutcome::AlreadySeeded {
                update_seq: info.update_seq,
            });
        }

        info!(
            "event=seed_run module=seed status=start bulk_size={}",
            self.data.bulk.len()
        );
        let bulk = self
            .store
            .bulk_docs(&self.data.bulk)
            .map_err(SeedError::BulkWrite)?;
        for rejected in bulk.iter().filter(|outcome| !outcome.is_ok()) {
            warn!(
                "event=seed_run module=seed status=item_rejected doc_id={}",
                rejected.id()
            );
        }

        let single = self.store.put(&self.data.single).map_err(SeedError::Put)?;
        info!(
            "event=seed_run module=seed status=ok duration_ms={} written={}",
            started_at.elapsed().as_millis(),
            bulk.iter().filter(|outcome| outcome.is_ok()).count() + 1
        );

        Ok(SeedOutcome::Seeded { bulk, single })
    }

    /// Runs the chain and hands any failure to `sink` exactly once.
    ///
    /// Returns `None` when the chain failed; never propagates the error.
    pub fn run_reported(&self, sink: &mut impl ErrorSink) -> Option<SeedOutcome> {
        match self.run() {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                sink.report(&err);
                None
            }
        }
    }
}
