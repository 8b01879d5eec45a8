//! Person record and identity key.
//!
//! # Responsibility
//! - Define the resident record as present in the upstream data file.
//! - Provide the normalized (first name, last name) key used to join persons
//!   with medical records.
//!
//! # Invariants
//! - `PersonKey` normalization is lowercase on both name parts; two spellings
//!   of the same name always produce equal keys.
//! - The store does not force key uniqueness for persons; namesakes are data.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Resident record.
///
/// Field names serialize in camelCase to match the upstream JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    /// Returns the normalized identity key for this person.
    pub fn key(&self) -> PersonKey {
        PersonKey::new(&self.first_name, &self.last_name)
    }
}

/// Case-insensitive identity key shared by persons and medical records.
///
/// Both name parts are stored lowercased, so `("John", "Boyd")` and
/// `("john", "BOYD")` compare equal and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonKey {
    first: String,
    last: String,
}

impl PersonKey {
    /// Builds a key from raw name parts, normalizing case.
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first: first_name.to_lowercase(),
            last: last_name.to_lowercase(),
        }
    }
}

impl Display for PersonKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}
