//! Core query/aggregation engine for emergency-dispatch lookups.
//!
//! Joins three independently-maintained record sets (persons, medical
//! records, fire-station coverage) into the derived views a dispatch caller
//! needs: children at an address, phone numbers behind a station, fire and
//! flood case summaries, person info and community emails.

pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use loader::{load_store_from_path, load_store_from_str, LoadError};
pub use logging::{default_log_level, init_logging};
pub use model::fire_station::FireStation;
pub use model::medical_record::MedicalRecord;
pub use model::person::{Person, PersonKey};
pub use repo::entity_store::{EntityStore, StoreError, StoreResult};
pub use service::age::age_on;
pub use service::dispatch_service::{DispatchService, QueryError, QueryResult};
pub use service::dto::{
    AddressPhoneAge, ChildWithFamily, FireCaseView, FloodCaseView, MedicalSummary, PersonInfo,
    StationCoverage,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
