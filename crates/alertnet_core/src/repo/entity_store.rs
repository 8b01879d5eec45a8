//! In-memory entity store with identity and coverage indexes.
//!
//! # Responsibility
//! - Hold persons, medical records and fire-station coverage for the process
//!   lifetime.
//! - Keep lookup indexes (name key, address, station number) in sync with
//!   every mutation.
//! - Reject writes that would create ambiguous join keys.
//!
//! # Invariants
//! - At most one medical record per normalized name key.
//! - At most one station number per covered address.
//! - Persons may share a name key (namesakes are data); name-keyed mutations
//!   refuse to proceed when more than one person matches.
//! - Readers always see a consistent snapshot via the reader-writer lock.

use crate::model::fire_station::FireStation;
use crate::model::medical_record::MedicalRecord;
use crate::model::person::{Person, PersonKey};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from entity store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An identical person record is already registered.
    PersonAlreadyExists { first_name: String, last_name: String },
    /// No person matches the name key.
    PersonNotFound { first_name: String, last_name: String },
    /// More than one person matches the name key; the caller must not mutate
    /// through an ambiguous key.
    AmbiguousPerson {
        first_name: String,
        last_name: String,
        matches: usize,
    },
    /// A medical record already exists for the name key.
    MedicalRecordAlreadyExists { first_name: String, last_name: String },
    /// No medical record matches the name key.
    MedicalRecordNotFound { first_name: String, last_name: String },
    /// The exact (station, address) coverage pair is already registered.
    CoverageAlreadyExists { station: u32, address: String },
    /// The address is already covered by a different station.
    AddressAlreadyCovered { address: String, covered_by: u32 },
    /// No coverage entry exists for the address.
    CoverageNotFound { address: String },
    /// No coverage entry exists for the station number.
    StationNotFound { station: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonAlreadyExists {
                first_name,
                last_name,
            } => write!(f, "{first_name} {last_name} is already registered"),
            Self::PersonNotFound {
                first_name,
                last_name,
            } => write!(f, "person not found: {first_name} {last_name}"),
            Self::AmbiguousPerson {
                first_name,
                last_name,
                matches,
            } => write!(
                f,
                "{matches} persons share the name {first_name} {last_name}; refusing ambiguous mutation"
            ),
            Self::MedicalRecordAlreadyExists {
                first_name,
                last_name,
            } => write!(f, "a medical record for {first_name} {last_name} already exists"),
            Self::MedicalRecordNotFound {
                first_name,
                last_name,
            } => write!(f, "medical record not found: {first_name} {last_name}"),
            Self::CoverageAlreadyExists { station, address } => write!(
                f,
                "station {station} already covers the address `{address}`"
            ),
            Self::AddressAlreadyCovered {
                address,
                covered_by,
            } => write!(
                f,
                "address `{address}` is already covered by station {covered_by}"
            ),
            Self::CoverageNotFound { address } => {
                write!(f, "no station covers the address `{address}`")
            }
            Self::StationNotFound { station } => {
                write!(f, "no coverage registered for station {station}")
            }
        }
    }
}

impl Error for StoreError {}

/// The locked inner view: base collections plus lookup indexes.
///
/// Resolution methods live here so that one read-lock acquisition yields a
/// consistent view for a whole query.
#[derive(Debug, Default)]
pub struct Directory {
    persons: Vec<Person>,
    person_index: HashMap<PersonKey, Vec<usize>>,
    address_index: HashMap<String, Vec<usize>>,
    records: HashMap<PersonKey, MedicalRecord>,
    station_by_address: HashMap<String, u32>,
    addresses_by_station: BTreeMap<u32, Vec<String>>,
}

impl Directory {
    /// All persons in insertion order.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// All medical records, ordered by normalized name key.
    pub fn medical_records(&self) -> Vec<&MedicalRecord> {
        let mut records: Vec<&MedicalRecord> = self.records.values().collect();
        records.sort_by_key(|record| record.key());
        records
    }

    /// All coverage entries, ordered by station number then registration order.
    pub fn fire_stations(&self) -> Vec<FireStation> {
        self.addresses_by_station
            .iter()
            .flat_map(|(&station, addresses)| {
                addresses.iter().map(move |address| FireStation {
                    address: address.clone(),
                    station,
                })
            })
            .collect()
    }

    /// Persons living at the exact address, in insertion order.
    pub fn persons_at_address(&self, address: &str) -> Vec<&Person> {
        self.address_index
            .get(address)
            .map(|indices| indices.iter().map(|&i| &self.persons[i]).collect())
            .unwrap_or_default()
    }

    /// Persons matching the case-insensitive name key, in insertion order.
    pub fn persons_named(&self, first_name: &str, last_name: &str) -> Vec<&Person> {
        self.person_index
            .get(&PersonKey::new(first_name, last_name))
            .map(|indices| indices.iter().map(|&i| &self.persons[i]).collect())
            .unwrap_or_default()
    }

    /// The medical record joined through the case-insensitive name key.
    pub fn medical_record_for(&self, first_name: &str, last_name: &str) -> Option<&MedicalRecord> {
        self.records.get(&PersonKey::new(first_name, last_name))
    }

    /// Addresses covered by the station number; empty when none are known.
    pub fn addresses_for_station(&self, station: u32) -> &[String] {
        self.addresses_by_station
            .get(&station)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The station covering an exact address.
    pub fn station_for_address(&self, address: &str) -> Option<u32> {
        self.station_by_address.get(address).copied()
    }

    fn rebuild_person_indexes(&mut self) {
        self.person_index.clear();
        self.address_index.clear();
        for (i, person) in self.persons.iter().enumerate() {
            self.person_index.entry(person.key()).or_default().push(i);
            self.address_index
                .entry(person.address.clone())
                .or_default()
                .push(i);
        }
    }
}

/// Thread-safe owner of the three base collections.
///
/// Readers take a shared lock for the duration of one query; writers take the
/// exclusive lock, so queries never observe a half-applied mutation.
#[derive(Debug, Default)]
pub struct EntityStore {
    inner: RwLock<Directory>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a consistent read view for the duration of one query.
    pub fn read(&self) -> RwLockReadGuard<'_, Directory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all persons.
    pub fn persons(&self) -> Vec<Person> {
        self.read().persons().to_vec()
    }

    /// Snapshot of all medical records, ordered by name key.
    pub fn medical_records(&self) -> Vec<MedicalRecord> {
        self.read().medical_records().into_iter().cloned().collect()
    }

    /// Snapshot of all coverage entries, ordered by station number.
    pub fn fire_stations(&self) -> Vec<FireStation> {
        self.read().fire_stations()
    }

    /// Registers a person.
    ///
    /// Namesakes are accepted; only a byte-identical duplicate is rejected.
    pub fn add_person(&self, person: Person) -> StoreResult<()> {
        let mut dir = self.write();
        if dir.persons.contains(&person) {
            return Err(StoreError::PersonAlreadyExists {
                first_name: person.first_name,
                last_name: person.last_name,
            });
        }
        debug!(
            "event=person_added module=store key={}",
            person.key()
        );
        dir.persons.push(person);
        dir.rebuild_person_indexes();
        Ok(())
    }

    /// Updates the non-name fields of the person matching the name key.
    ///
    /// Fails with `AmbiguousPerson` when several persons share the key, so a
    /// mutation never silently picks one of multiple matches.
    pub fn update_person(&self, person: Person) -> StoreResult<Person> {
        let mut dir = self.write();
        let target = single_person_index(&dir, &person.first_name, &person.last_name)?;
        let stored = &mut dir.persons[target];
        stored.address = person.address;
        stored.city = person.city;
        stored.zip = person.zip;
        stored.phone = person.phone;
        stored.email = person.email;
        let updated = stored.clone();
        debug!("event=person_updated module=store key={}", updated.key());
        dir.rebuild_person_indexes();
        Ok(updated)
    }

    /// Removes the person matching the name key.
    pub fn delete_person(&self, first_name: &str, last_name: &str) -> StoreResult<Person> {
        let mut dir = self.write();
        let target = single_person_index(&dir, first_name, last_name)?;
        let removed = dir.persons.remove(target);
        debug!("event=person_deleted module=store key={}", removed.key());
        dir.rebuild_person_indexes();
        Ok(removed)
    }

    /// Registers a medical record; at most one may exist per name key.
    pub fn add_medical_record(&self, record: MedicalRecord) -> StoreResult<()> {
        let mut dir = self.write();
        let key = record.key();
        if dir.records.contains_key(&key) {
            return Err(StoreError::MedicalRecordAlreadyExists {
                first_name: record.first_name,
                last_name: record.last_name,
            });
        }
        debug!("event=medical_record_added module=store key={key}");
        dir.records.insert(key, record);
        Ok(())
    }

    /// Replaces the medical fields of the record matching the name key.
    pub fn update_medical_record(&self, record: MedicalRecord) -> StoreResult<MedicalRecord> {
        let mut dir = self.write();
        let key = record.key();
        let stored = dir
            .records
            .get_mut(&key)
            .ok_or_else(|| StoreError::MedicalRecordNotFound {
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
            })?;
        stored.birthdate = record.birthdate;
        stored.medications = record.medications;
        stored.allergies = record.allergies;
        debug!("event=medical_record_updated module=store key={key}");
        Ok(stored.clone())
    }

    /// Removes the medical record matching the name key.
    pub fn delete_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<MedicalRecord> {
        let mut dir = self.write();
        let key = PersonKey::new(first_name, last_name);
        let removed = dir
            .records
            .remove(&key)
            .ok_or_else(|| StoreError::MedicalRecordNotFound {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })?;
        debug!("event=medical_record_deleted module=store key={key}");
        Ok(removed)
    }

    /// Registers a coverage entry.
    ///
    /// Each address may be covered by exactly one station; re-registering the
    /// same pair and re-covering an address by another station both fail.
    pub fn add_coverage(&self, entry: FireStation) -> StoreResult<()> {
        let mut dir = self.write();
        if let Some(&covered_by) = dir.station_by_address.get(&entry.address) {
            if covered_by == entry.station {
                return Err(StoreError::CoverageAlreadyExists {
                    station: entry.station,
                    address: entry.address,
                });
            }
            return Err(StoreError::AddressAlreadyCovered {
                address: entry.address,
                covered_by,
            });
        }
        debug!(
            "event=coverage_added module=store station={} address={}",
            entry.station, entry.address
        );
        dir.station_by_address
            .insert(entry.address.clone(), entry.station);
        dir.addresses_by_station
            .entry(entry.station)
            .or_default()
            .push(entry.address);
        Ok(())
    }

    /// Moves an already-covered address to another station number.
    pub fn update_coverage(&self, entry: FireStation) -> StoreResult<()> {
        let mut dir = self.write();
        let previous = match dir.station_by_address.get(&entry.address) {
            Some(&station) => station,
            None => {
                return Err(StoreError::CoverageNotFound {
                    address: entry.address,
                })
            }
        };
        if previous == entry.station {
            return Ok(());
        }
        detach_address(&mut dir, previous, &entry.address);
        debug!(
            "event=coverage_updated module=store address={} from={previous} to={}",
            entry.address, entry.station
        );
        dir.station_by_address
            .insert(entry.address.clone(), entry.station);
        dir.addresses_by_station
            .entry(entry.station)
            .or_default()
            .push(entry.address);
        Ok(())
    }

    /// Removes the coverage entry for one address.
    pub fn delete_coverage_by_address(&self, address: &str) -> StoreResult<FireStation> {
        let mut dir = self.write();
        let station = dir
            .station_by_address
            .remove(address)
            .ok_or_else(|| StoreError::CoverageNotFound {
                address: address.to_string(),
            })?;
        detach_address(&mut dir, station, address);
        debug!("event=coverage_deleted module=store station={station} address={address}");
        Ok(FireStation {
            address: address.to_string(),
            station,
        })
    }

    /// Removes every coverage entry of one station number.
    pub fn delete_station(&self, station: u32) -> StoreResult<Vec<FireStation>> {
        let mut dir = self.write();
        let addresses = dir
            .addresses_by_station
            .remove(&station)
            .ok_or(StoreError::StationNotFound { station })?;
        for address in &addresses {
            dir.station_by_address.remove(address);
        }
        debug!(
            "event=station_deleted module=store station={station} addresses={}",
            addresses.len()
        );
        Ok(addresses
            .into_iter()
            .map(|address| FireStation { address, station })
            .collect())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Directory> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn single_person_index(
    dir: &Directory,
    first_name: &str,
    last_name: &str,
) -> StoreResult<usize> {
    let matches = dir
        .person_index
        .get(&PersonKey::new(first_name, last_name))
        .map(Vec::as_slice)
        .unwrap_or_default();
    match matches {
        [] => Err(StoreError::PersonNotFound {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }),
        [index] => Ok(*index),
        _ => Err(StoreError::AmbiguousPerson {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            matches: matches.len(),
        }),
    }
}

fn detach_address(dir: &mut Directory, station: u32, address: &str) {
    if let Some(addresses) = dir.addresses_by_station.get_mut(&station) {
        addresses.retain(|candidate| candidate != address);
        if addresses.is_empty() {
            dir.addresses_by_station.remove(&station);
        }
    }
}
