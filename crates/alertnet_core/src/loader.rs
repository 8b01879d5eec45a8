//! Startup data ingestion.
//!
//! # Responsibility
//! - Parse the upstream JSON document (`persons` / `firestations` /
//!   `medicalrecords` arrays) and populate a fresh store.
//!
//! # Invariants
//! - Loading goes through the same conflict-checked store paths as runtime
//!   CRUD; a duplicate medical record or double-covered address in the file
//!   is a load error, never a silently-resolved ambiguity.

use crate::model::fire_station::FireStation;
use crate::model::medical_record::MedicalRecord;
use crate::model::person::Person;
use crate::repo::entity_store::{EntityStore, StoreError};
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Shape of the upstream data document.
#[derive(Debug, Deserialize)]
struct DataDocument {
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    firestations: Vec<FireStation>,
    #[serde(default)]
    medicalrecords: Vec<MedicalRecord>,
}

/// Errors from startup data loading.
#[derive(Debug)]
pub enum LoadError {
    /// The data file could not be read.
    Io { path: String, source: std::io::Error },
    /// The document is not valid JSON or violates the expected shape.
    Parse(serde_json::Error),
    /// The document contains conflicting records.
    Conflict(StoreError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read data file `{path}`: {source}"),
            Self::Parse(err) => write!(f, "invalid data document: {err}"),
            Self::Conflict(err) => write!(f, "conflicting data document: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Conflict(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for LoadError {
    fn from(value: StoreError) -> Self {
        Self::Conflict(value)
    }
}

/// Loads a store from a JSON data file on disk.
pub fn load_store_from_path(path: &Path) -> Result<EntityStore, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_store_from_str(&raw)
}

/// Loads a store from an in-memory JSON document.
pub fn load_store_from_str(raw: &str) -> Result<EntityStore, LoadError> {
    let document: DataDocument = serde_json::from_str(raw)?;
    let store = EntityStore::new();

    let persons = document.persons.len();
    let stations = document.firestations.len();
    let records = document.medicalrecords.len();

    for person in document.persons {
        store.add_person(person)?;
    }
    for entry in document.firestations {
        store.add_coverage(entry)?;
    }
    for record in document.medicalrecords {
        store.add_medical_record(record)?;
    }

    info!(
        "event=data_loaded module=loader status=ok persons={persons} stations={stations} records={records}"
    );
    Ok(store)
}
