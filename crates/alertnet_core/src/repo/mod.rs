//! Entity store layer.
//!
//! # Responsibility
//! - Own the three base collections behind a reader-writer lock.
//! - Provide identity/address/station resolution over a consistent snapshot.
//!
//! # Invariants
//! - Every query observes one locked view; a concurrent write never produces
//!   a torn read.
//! - Write paths return semantic errors (`NotFound`, conflict, ambiguity)
//!   instead of silently picking one of several matches.

pub mod entity_store;
