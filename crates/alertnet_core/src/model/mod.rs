//! Domain models for the dispatch directory.
//!
//! # Responsibility
//! - Define the three base record shapes loaded from the upstream data file.
//! - Define the normalized identity key joining persons and medical records.
//!
//! # Invariants
//! - Identity comparison is always case-insensitive via [`person::PersonKey`].
//! - Models carry no derived state; ages and groupings are computed per query.

pub mod fire_station;
pub mod medical_record;
pub mod person;
