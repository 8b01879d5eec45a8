use alertnet_core::{
    DispatchService, EntityStore, FireStation, MedicalRecord, Person, QueryError,
};
use chrono::NaiveDate;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Birthdate on Jan 1, so the birthday has always passed by the reference
/// date and the age is exact.
fn birthdate_for_age(age: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024 - age as i32, 1, 1).unwrap()
}

fn person(first: &str, last: &str, address: &str, city: &str, phone: &str, email: &str) -> Person {
    Person {
        first_name: first.to_string(),
        last_name: last.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        zip: "97451".to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    }
}

fn record_aged(first: &str, last: &str, age: u32) -> MedicalRecord {
    MedicalRecord {
        first_name: first.to_string(),
        last_name: last.to_string(),
        birthdate: Some(birthdate_for_age(age)),
        medications: vec!["aznol:350mg".to_string()],
        allergies: vec!["nillacilan".to_string()],
    }
}

fn coverage(address: &str, station: u32) -> FireStation {
    FireStation {
        address: address.to_string(),
        station,
    }
}

fn culver_household() -> EntityStore {
    let store = EntityStore::new();
    store
        .add_person(person(
            "John",
            "Boyd",
            "1509 Culver St",
            "Culver",
            "841-874-6512",
            "jaboyd@email.com",
        ))
        .unwrap();
    store
        .add_person(person(
            "Tenley",
            "Boyd",
            "1509 Culver St",
            "Culver",
            "841-874-6512",
            "tenz@email.com",
        ))
        .unwrap();
    store.add_medical_record(record_aged("John", "Boyd", 35)).unwrap();
    store.add_medical_record(record_aged("Tenley", "Boyd", 9)).unwrap();
    store
}

#[test]
fn children_by_address_returns_child_with_family() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let children = service
        .children_by_address_on("1509 Culver St", today())
        .unwrap();

    assert_eq!(children.len(), 1);
    let child = &children[0];
    assert_eq!(child.first_name, "Tenley");
    assert_eq!(child.last_name, "Boyd");
    assert_eq!(child.age, 9);
    assert_eq!(child.family_members.len(), 1);
    assert_eq!(child.family_members[0].first_name, "John");
}

#[test]
fn children_by_address_family_shares_address_and_excludes_the_child() {
    let store = culver_household();
    store
        .add_person(person(
            "Felicia",
            "Marrack",
            "1509 Culver St",
            "Culver",
            "841-874-6544",
            "fmarrack@email.com",
        ))
        .unwrap();
    store.add_medical_record(record_aged("Felicia", "Marrack", 38)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let children = service
        .children_by_address_on("1509 Culver St", today())
        .unwrap();

    let child = &children[0];
    // Family is everyone else at the address, not just matching last names.
    assert_eq!(child.family_members.len(), 2);
    for member in &child.family_members {
        assert_eq!(member.address, "1509 Culver St");
        assert!(!(member.first_name == "Tenley" && member.last_name == "Boyd"));
    }
}

#[test]
fn children_by_address_fails_for_empty_address() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let err = service
        .children_by_address_on("29 15th St", today())
        .unwrap_err();
    assert_eq!(err, QueryError::NobodyAtAddress("29 15th St".to_string()));
}

#[test]
fn children_by_address_fails_when_only_adults_live_there() {
    let store = EntityStore::new();
    store
        .add_person(person(
            "John",
            "Boyd",
            "1509 Culver St",
            "Culver",
            "841-874-6512",
            "jaboyd@email.com",
        ))
        .unwrap();
    store.add_medical_record(record_aged("John", "Boyd", 35)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let err = service
        .children_by_address_on("1509 Culver St", today())
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::NoChildrenAtAddress("1509 Culver St".to_string())
    );
}

#[test]
fn phone_numbers_by_station_deduplicates_in_first_occurrence_order() {
    let store = culver_household();
    store.add_coverage(coverage("1509 Culver St", 3)).unwrap();
    store
        .add_person(person(
            "Peter",
            "Duncan",
            "644 Gershwin Cir",
            "Culver",
            "841-874-6512",
            "jaboyd@email.com",
        ))
        .unwrap();
    store
        .add_person(person(
            "Reginold",
            "Walker",
            "644 Gershwin Cir",
            "Culver",
            "841-874-8547",
            "reg@email.com",
        ))
        .unwrap();
    store.add_coverage(coverage("644 Gershwin Cir", 3)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let phones = service.phone_numbers_by_station(3).unwrap();

    // John, Tenley and Peter share one phone number.
    assert_eq!(phones, ["841-874-6512", "841-874-8547"]);
}

#[test]
fn phone_numbers_by_station_fails_for_unknown_station() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let err = service.phone_numbers_by_station(9).unwrap_err();
    assert_eq!(err, QueryError::StationNotFound(9));
}

#[test]
fn round_trip_new_coverage_exposes_resident_phones() {
    let store = culver_household();
    store.add_coverage(coverage("1509 Culver St", 7)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let phones = service.phone_numbers_by_station(7).unwrap();
    assert!(phones.contains(&"841-874-6512".to_string()));
}

#[test]
fn people_concerned_by_station_partitions_adults_and_children() {
    let store = EntityStore::new();
    let ages = [35u32, 9, 40, 12, 70];
    for (i, age) in ages.into_iter().enumerate() {
        let first = format!("Resident{i}");
        store
            .add_person(person(
                &first,
                "Culver",
                "1509 Culver St",
                "Culver",
                &format!("841-874-00{i}"),
                &format!("r{i}@email.com"),
            ))
            .unwrap();
        store.add_medical_record(record_aged(&first, "Culver", age)).unwrap();
    }
    store.add_coverage(coverage("1509 Culver St", 3)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let result = service.people_concerned_by_station_on(3, today()).unwrap();

    assert_eq!(result.persons.len(), 5);
    assert_eq!(result.adults, 3);
    assert_eq!(result.children, 2);
    assert_eq!(
        result.adults + result.children,
        result.persons.len() as u32
    );
}

#[test]
fn age_eighteen_is_a_child_and_nineteen_is_an_adult() {
    let store = EntityStore::new();
    for (first, age) in [("Exact", 18u32), ("Older", 19)] {
        store
            .add_person(person(
                first,
                "Boundary",
                "834 Binoc Ave",
                "Culver",
                "841-874-6512",
                "b@email.com",
            ))
            .unwrap();
        store.add_medical_record(record_aged(first, "Boundary", age)).unwrap();
    }
    store.add_coverage(coverage("834 Binoc Ave", 2)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let result = service.people_concerned_by_station_on(2, today()).unwrap();
    assert_eq!(result.children, 1);
    assert_eq!(result.adults, 1);

    let children = service.children_by_address_on("834 Binoc Ave", today()).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].first_name, "Exact");
    assert_eq!(children[0].age, 18);
}

#[test]
fn person_without_medical_record_is_omitted_from_coverage() {
    let store = culver_household();
    store
        .add_person(person(
            "Unknown",
            "Resident",
            "1509 Culver St",
            "Culver",
            "841-874-9999",
            "u@email.com",
        ))
        .unwrap();
    store.add_coverage(coverage("1509 Culver St", 3)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let result = service.people_concerned_by_station_on(3, today()).unwrap();

    assert_eq!(result.persons.len(), 2);
    assert_eq!(result.adults + result.children, result.persons.len() as u32);
    assert!(result
        .persons
        .iter()
        .all(|summary| summary.first_name != "Unknown"));
}

#[test]
fn fire_case_returns_summaries_and_station() {
    let store = culver_household();
    store.add_coverage(coverage("1509 Culver St", 3)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let view = service.fire_case_on("1509 Culver St", today()).unwrap();

    assert_eq!(view.station, Some(3));
    assert_eq!(view.persons.len(), 2);
    let john = view
        .persons
        .iter()
        .find(|summary| summary.age == 35)
        .unwrap();
    assert_eq!(john.last_name, "Boyd");
    assert_eq!(john.phone, "841-874-6512");
    assert_eq!(john.medications, ["aznol:350mg"]);
    assert_eq!(john.allergies, ["nillacilan"]);
}

#[test]
fn fire_case_on_uncovered_address_still_lists_residents() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let view = service.fire_case_on("1509 Culver St", today()).unwrap();
    assert_eq!(view.station, None);
    assert_eq!(view.persons.len(), 2);
}

#[test]
fn fire_case_fails_when_nobody_lives_there() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let err = service.fire_case_on("947 E. Rose Dr", today()).unwrap_err();
    assert_eq!(err, QueryError::NobodyAtAddress("947 E. Rose Dr".to_string()));
}

#[test]
fn flood_case_groups_by_address_and_skips_empty_stations() {
    let store = culver_household();
    store.add_coverage(coverage("1509 Culver St", 3)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let view = service.flood_case_on(&[3, 4], today()).unwrap();

    assert_eq!(view.len(), 1);
    let summaries = view.get("1509 Culver St").unwrap();
    assert_eq!(summaries.len(), 2);
}

#[test]
fn flood_case_fails_when_no_station_yields_residents() {
    let store = EntityStore::new();
    // Covered address with no residents must not satisfy the query either.
    store.add_coverage(coverage("644 Gershwin Cir", 1)).unwrap();
    let service = DispatchService::new(Arc::new(store));

    let err = service.flood_case_on(&[1, 2], today()).unwrap_err();
    assert_eq!(err, QueryError::NoCoverage(vec![1, 2]));
}

#[test]
fn person_info_matches_case_insensitively() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let infos = service.person_info_on("JOHN", "boyd", today()).unwrap();

    assert_eq!(infos.len(), 1);
    let info = &infos[0];
    assert_eq!(info.last_name, "Boyd");
    assert_eq!(info.address, "1509 Culver St");
    assert_eq!(info.age, 35);
    assert_eq!(info.email, "jaboyd@email.com");
    assert_eq!(info.medications, ["aznol:350mg"]);
    assert_eq!(info.allergies, ["nillacilan"]);
}

#[test]
fn person_info_returns_every_namesake() {
    let store = culver_household();
    store
        .add_person(person(
            "John",
            "Boyd",
            "29 15th St",
            "Culver",
            "841-874-7462",
            "other.jboyd@email.com",
        ))
        .unwrap();
    let service = DispatchService::new(Arc::new(store));

    let infos = service.person_info_on("John", "Boyd", today()).unwrap();

    assert_eq!(infos.len(), 2);
    let addresses: Vec<&str> = infos.iter().map(|info| info.address.as_str()).collect();
    assert!(addresses.contains(&"1509 Culver St"));
    assert!(addresses.contains(&"29 15th St"));
}

#[test]
fn person_info_fails_for_unknown_name() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let err = service.person_info_on("Jane", "Doe", today()).unwrap_err();
    assert_eq!(
        err,
        QueryError::PersonNotFound {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        }
    );
}

#[test]
fn community_emails_deduplicates_by_first_occurrence() {
    let store = EntityStore::new();
    let residents = [
        ("Alice", "a@x.com"),
        ("Bob", "a@x.com"),
        ("Carol", "b@x.com"),
    ];
    for (first, email) in residents {
        store
            .add_person(person(
                first,
                "Culver",
                "1509 Culver St",
                "Culver",
                "841-874-6512",
                email,
            ))
            .unwrap();
    }
    let service = DispatchService::new(Arc::new(store));

    let emails = service.community_emails("Culver").unwrap();
    assert_eq!(emails, ["a@x.com", "b@x.com"]);
}

#[test]
fn community_emails_city_match_is_exact() {
    let service = DispatchService::new(Arc::new(culver_household()));

    let err = service.community_emails("culver").unwrap_err();
    assert_eq!(err, QueryError::NoEmailsForCity("culver".to_string()));
}
