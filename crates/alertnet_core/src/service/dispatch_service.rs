//! Dispatch query engine.
//!
//! # Responsibility
//! - Implement the seven read-only emergency-dispatch queries over one store
//!   snapshot per call.
//! - Classify residents by age (<= 18 is a child) and group them by address
//!   or station coverage.
//!
//! # Invariants
//! - Every operation acquires exactly one read view; results are consistent
//!   even while CRUD writes run concurrently.
//! - A person without a resolvable medical record is omitted from medical and
//!   age-classified views, with a warning logged; counts are computed over
//!   the persons actually included.
//! - "Not found" is a typed error, distinct from a successful empty value.

use crate::model::person::Person;
use crate::repo::entity_store::{Directory, EntityStore};
use crate::service::age::age_on;
use crate::service::dto::{
    AddressPhoneAge, ChildWithFamily, FireCaseView, FloodCaseView, MedicalSummary, PersonInfo,
    StationCoverage,
};
use chrono::{Local, NaiveDate};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Upper bound of the child classification; ages above this are adults.
const CHILD_AGE_LIMIT: u32 = 18;

pub type QueryResult<T> = Result<T, QueryError>;

/// Not-found signals raised by the dispatch queries.
///
/// All variants are recoverable by the caller choosing a different input; the
/// surrounding transport layer maps them to 404-style responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Nobody lives at the given address.
    NobodyAtAddress(String),
    /// The address has residents, but none is 18 or younger.
    NoChildrenAtAddress(String),
    /// No coverage is registered for the station number.
    StationNotFound(u32),
    /// None of the station numbers yielded any resident.
    NoCoverage(Vec<u32>),
    /// No person matches the name pair.
    PersonNotFound {
        first_name: String,
        last_name: String,
    },
    /// No resident of the city has an email on file.
    NoEmailsForCity(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NobodyAtAddress(address) => write!(f, "nobody found at `{address}`"),
            Self::NoChildrenAtAddress(address) => {
                write!(f, "no children found at `{address}`")
            }
            Self::StationNotFound(station) => {
                write!(f, "no fire station found with the number {station}")
            }
            Self::NoCoverage(stations) => {
                write!(f, "no residents covered by stations {stations:?}")
            }
            Self::PersonNotFound {
                first_name,
                last_name,
            } => write!(f, "nobody found with the name {first_name} {last_name}"),
            Self::NoEmailsForCity(city) => {
                write!(f, "no email found for people living in `{city}`")
            }
        }
    }
}

impl Error for QueryError {}

/// Read-only query facade over the shared entity store.
pub struct DispatchService {
    store: Arc<EntityStore>,
}

impl DispatchService {
    /// Creates a service sharing the given store.
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Children living at the address, each with their co-residents attached.
    ///
    /// Not found when nobody lives there, or when residents exist but none is
    /// 18 or younger.
    pub fn children_by_address(&self, address: &str) -> QueryResult<Vec<ChildWithFamily>> {
        self.children_by_address_on(address, today())
    }

    /// Same as [`Self::children_by_address`] with an explicit reference date.
    pub fn children_by_address_on(
        &self,
        address: &str,
        today: NaiveDate,
    ) -> QueryResult<Vec<ChildWithFamily>> {
        let dir = self.store.read();
        let residents = residents_at(&dir, address)?;

        let mut children = Vec::new();
        for person in &residents {
            let Some(record) = dir.medical_record_for(&person.first_name, &person.last_name)
            else {
                skip_without_record(person, "children_by_address");
                continue;
            };
            let age = age_on(record.birthdate, today);
            if age <= CHILD_AGE_LIMIT {
                let family: Vec<Person> = residents
                    .iter()
                    .filter(|other| other.key() != person.key())
                    .map(|other| (*other).clone())
                    .collect();
                children.push(ChildWithFamily {
                    first_name: person.first_name.clone(),
                    last_name: person.last_name.clone(),
                    age,
                    family_members: family,
                });
            }
        }

        if children.is_empty() {
            error!("event=query_empty module=engine query=children_by_address address={address}");
            return Err(QueryError::NoChildrenAtAddress(address.to_string()));
        }
        debug!(
            "event=query_done module=engine query=children_by_address address={address} children={}",
            children.len()
        );
        Ok(children)
    }

    /// Distinct phone numbers of everyone covered by the station number, in
    /// first-occurrence order.
    pub fn phone_numbers_by_station(&self, station: u32) -> QueryResult<Vec<String>> {
        let dir = self.store.read();
        let addresses = covered_addresses(&dir, station)?;

        let mut phones: Vec<String> = Vec::new();
        for address in addresses {
            for person in dir.persons_at_address(address) {
                if !phones.contains(&person.phone) {
                    phones.push(person.phone.clone());
                }
            }
        }
        debug!(
            "event=query_done module=engine query=phone_numbers_by_station station={station} phones={}",
            phones.len()
        );
        Ok(phones)
    }

    /// Everyone covered by the station number, with adult/child counts.
    pub fn people_concerned_by_station(&self, station: u32) -> QueryResult<StationCoverage> {
        self.people_concerned_by_station_on(station, today())
    }

    /// Same as [`Self::people_concerned_by_station`] with an explicit
    /// reference date.
    pub fn people_concerned_by_station_on(
        &self,
        station: u32,
        today: NaiveDate,
    ) -> QueryResult<StationCoverage> {
        let dir = self.store.read();
        let addresses = covered_addresses(&dir, station)?;

        let mut persons = Vec::new();
        let mut adults = 0;
        let mut children = 0;
        for address in addresses {
            for person in dir.persons_at_address(address) {
                let Some(record) = dir.medical_record_for(&person.first_name, &person.last_name)
                else {
                    skip_without_record(person, "people_concerned_by_station");
                    continue;
                };
                let age = age_on(record.birthdate, today);
                if age <= CHILD_AGE_LIMIT {
                    children += 1;
                } else {
                    adults += 1;
                }
                persons.push(AddressPhoneAge {
                    first_name: person.first_name.clone(),
                    last_name: person.last_name.clone(),
                    address: person.address.clone(),
                    phone: person.phone.clone(),
                    age,
                });
            }
        }
        debug!(
            "event=query_done module=engine query=people_concerned_by_station station={station} adults={adults} children={children}"
        );
        Ok(StationCoverage {
            persons,
            adults,
            children,
        })
    }

    /// Fire view for one address: resident medical summaries plus the
    /// covering station number.
    ///
    /// Not found only when nobody lives at the address. An uncovered address
    /// still returns its residents, with `station: None`.
    pub fn fire_case(&self, address: &str) -> QueryResult<FireCaseView> {
        self.fire_case_on(address, today())
    }

    /// Same as [`Self::fire_case`] with an explicit reference date.
    pub fn fire_case_on(&self, address: &str, today: NaiveDate) -> QueryResult<FireCaseView> {
        let dir = self.store.read();
        let residents = residents_at(&dir, address)?;
        let persons = medical_summaries(&dir, &residents, today, "fire_case");

        let station = dir.station_for_address(address);
        if station.is_none() {
            warn!("event=uncovered_address module=engine query=fire_case address={address}");
        }
        debug!(
            "event=query_done module=engine query=fire_case address={address} persons={}",
            persons.len()
        );
        Ok(FireCaseView { persons, station })
    }

    /// Flood view for a set of station numbers: resident medical summaries
    /// grouped by covered address.
    ///
    /// A station number without coverage is skipped silently; the query fails
    /// only when no station yields any resident.
    pub fn flood_case(&self, stations: &[u32]) -> QueryResult<FloodCaseView> {
        self.flood_case_on(stations, today())
    }

    /// Same as [`Self::flood_case`] with an explicit reference date.
    pub fn flood_case_on(&self, stations: &[u32], today: NaiveDate) -> QueryResult<FloodCaseView> {
        let dir = self.store.read();

        let mut grouped = FloodCaseView::new();
        for &station in stations {
            let addresses = dir.addresses_for_station(station);
            if addresses.is_empty() {
                debug!("event=station_skipped module=engine query=flood_case station={station}");
                continue;
            }
            for address in addresses {
                if grouped.contains_key(address) {
                    continue;
                }
                let residents = dir.persons_at_address(address);
                if residents.is_empty() {
                    debug!(
                        "event=address_skipped module=engine query=flood_case address={address}"
                    );
                    continue;
                }
                let summaries = medical_summaries(&dir, &residents, today, "flood_case");
                grouped.insert(address.clone(), summaries);
            }
        }

        if grouped.is_empty() {
            error!("event=query_empty module=engine query=flood_case stations={stations:?}");
            return Err(QueryError::NoCoverage(stations.to_vec()));
        }
        debug!(
            "event=query_done module=engine query=flood_case stations={stations:?} addresses={}",
            grouped.len()
        );
        Ok(grouped)
    }

    /// Info records for every person matching the case-insensitive name pair.
    ///
    /// Namesakes are returned as multiple entries.
    pub fn person_info(&self, first_name: &str, last_name: &str) -> QueryResult<Vec<PersonInfo>> {
        self.person_info_on(first_name, last_name, today())
    }

    /// Same as [`Self::person_info`] with an explicit reference date.
    pub fn person_info_on(
        &self,
        first_name: &str,
        last_name: &str,
        today: NaiveDate,
    ) -> QueryResult<Vec<PersonInfo>> {
        let dir = self.store.read();
        let matches = dir.persons_named(first_name, last_name);
        if matches.is_empty() {
            error!(
                "event=query_empty module=engine query=person_info first_name={first_name} last_name={last_name}"
            );
            return Err(QueryError::PersonNotFound {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            });
        }

        let mut infos = Vec::new();
        for person in matches {
            let Some(record) = dir.medical_record_for(&person.first_name, &person.last_name)
            else {
                skip_without_record(person, "person_info");
                continue;
            };
            infos.push(PersonInfo {
                last_name: person.last_name.clone(),
                address: person.address.clone(),
                age: age_on(record.birthdate, today),
                email: person.email.clone(),
                medications: record.medications.clone(),
                allergies: record.allergies.clone(),
            });
        }

        if infos.is_empty() {
            error!(
                "event=query_empty module=engine query=person_info first_name={first_name} last_name={last_name} reason=no_medical_record"
            );
            return Err(QueryError::PersonNotFound {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            });
        }
        Ok(infos)
    }

    /// Distinct emails of everyone living in the city, in first-occurrence
    /// order. City comparison is exact.
    pub fn community_emails(&self, city: &str) -> QueryResult<Vec<String>> {
        let dir = self.store.read();

        let mut emails: Vec<String> = Vec::new();
        for person in dir.persons() {
            if person.city == city && !emails.contains(&person.email) {
                emails.push(person.email.clone());
            }
        }

        if emails.is_empty() {
            error!("event=query_empty module=engine query=community_emails city={city}");
            return Err(QueryError::NoEmailsForCity(city.to_string()));
        }
        debug!(
            "event=query_done module=engine query=community_emails city={city} emails={}",
            emails.len()
        );
        Ok(emails)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn residents_at<'dir>(dir: &'dir Directory, address: &str) -> QueryResult<Vec<&'dir Person>> {
    let residents = dir.persons_at_address(address);
    if residents.is_empty() {
        error!("event=lookup_empty module=engine address={address}");
        return Err(QueryError::NobodyAtAddress(address.to_string()));
    }
    Ok(residents)
}

fn covered_addresses<'dir>(dir: &'dir Directory, station: u32) -> QueryResult<&'dir [String]> {
    let addresses = dir.addresses_for_station(station);
    if addresses.is_empty() {
        error!("event=lookup_empty module=engine station={station}");
        return Err(QueryError::StationNotFound(station));
    }
    Ok(addresses)
}

fn medical_summaries(
    dir: &Directory,
    residents: &[&Person],
    today: NaiveDate,
    query: &str,
) -> Vec<MedicalSummary> {
    let mut summaries = Vec::with_capacity(residents.len());
    for person in residents {
        let Some(record) = dir.medical_record_for(&person.first_name, &person.last_name) else {
            skip_without_record(person, query);
            continue;
        };
        summaries.push(MedicalSummary {
            last_name: person.last_name.clone(),
            phone: person.phone.clone(),
            age: age_on(record.birthdate, today),
            medications: record.medications.clone(),
            allergies: record.allergies.clone(),
        });
    }
    summaries
}

fn skip_without_record(person: &Person, query: &str) {
    warn!(
        "event=missing_medical_record module=engine query={query} key={} action=omitted",
        person.key()
    );
}
