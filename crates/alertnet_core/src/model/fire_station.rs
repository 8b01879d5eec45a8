//! Fire-station coverage mapping model.
//!
//! # Responsibility
//! - Define one (station number, covered address) mapping entry.
//! - Accept the upstream file's string-typed station numbers on input.
//!
//! # Invariants
//! - Many addresses may map to one station; each address should be covered by
//!   exactly one station. The store enforces the second half at write time.

use serde::{Deserialize, Serialize};

/// One coverage entry: `station` is responsible for `address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireStation {
    pub address: String,
    /// Station number. The upstream document spells this as a quoted string
    /// (`"station": "3"`), so deserialization accepts both forms.
    #[serde(deserialize_with = "station_number")]
    pub station: u32,
}

fn station_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse::<u32>().map_err(|_| {
            serde::de::Error::custom(format!("invalid station number `{text}`"))
        }),
    }
}
