//! One-time demo seeding of an empty store.
//!
//! # Responsibility
//! - Own the fixed dinosaur-facts data set.
//! - Decide, from the store update sequence, whether seeding should run.
//!
//! # Invariants
//! - Seeding writes only when `update_seq == 0` at the time of the check.
//! - The emptiness check is not atomic with the writes that follow it.

pub mod demo_data;
pub mod guard;
