//! Derived view types assembled by the dispatch queries.
//!
//! Nothing here is persisted; every view is recomputed per call from the
//! current store snapshot.

use crate::model::person::Person;
use serde::Serialize;
use std::collections::BTreeMap;

/// One child at an address, with the other residents attached as family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildWithFamily {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    /// Co-residents at the same address, excluding the child itself.
    pub family_members: Vec<Person>,
}

/// Name/address/phone/age summary used by station coverage views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPhoneAge {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub age: u32,
}

/// Everyone covered by one station, partitioned into adults and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCoverage {
    pub persons: Vec<AddressPhoneAge>,
    pub adults: u32,
    pub children: u32,
}

/// Per-person medical summary used by fire and flood views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalSummary {
    pub last_name: String,
    pub phone: String,
    pub age: u32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

/// Fire view for one address: resident summaries plus the covering station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireCaseView {
    pub persons: Vec<MedicalSummary>,
    /// `None` when no station covers the address; residents are still listed.
    pub station: Option<u32>,
}

/// Flood view: resident medical summaries grouped by covered address.
///
/// A `BTreeMap` keeps address grouping deterministic for tests and output.
pub type FloodCaseView = BTreeMap<String, Vec<MedicalSummary>>;

/// Full info record for a name-pair lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInfo {
    pub last_name: String,
    pub address: String,
    pub age: u32,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}
