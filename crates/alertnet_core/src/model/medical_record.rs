//! Medical record model.
//!
//! # Responsibility
//! - Define the per-person medical record as present in the upstream file.
//! - Parse and render the upstream `MM/dd/yyyy` birthdate format.
//!
//! # Invariants
//! - `birthdate` is optional; an absent birthdate is valid data, and age
//!   computation treats it as age 0 (see `service::age`).
//! - Medication and allergy lists preserve the order of the source document.

use crate::model::person::PersonKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Medical record, conceptually 1:1 with a [`crate::model::person::Person`]
/// through the normalized identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub first_name: String,
    pub last_name: String,
    /// Birthdate in the upstream `MM/dd/yyyy` spelling; `None` when unknown.
    #[serde(with = "birthdate_format", default)]
    pub birthdate: Option<NaiveDate>,
    /// Free-text dose strings, e.g. `"aznol:350mg"`.
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl MedicalRecord {
    /// Returns the normalized identity key for this record.
    pub fn key(&self) -> PersonKey {
        PersonKey::new(&self.first_name, &self.last_name)
    }
}

/// Serde adapter for the upstream `MM/dd/yyyy` birthdate spelling.
pub mod birthdate_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => NaiveDate::parse_from_str(&text, FORMAT)
                .map(Some)
                .map_err(|err| {
                    serde::de::Error::custom(format!("invalid birthdate `{text}`: {err}"))
                }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MedicalRecord;
    use chrono::NaiveDate;

    #[test]
    fn birthdate_parses_upstream_format() {
        let raw = r#"{
            "firstName": "John",
            "lastName": "Boyd",
            "birthdate": "03/06/1984",
            "medications": ["aznol:350mg"],
            "allergies": ["nillacilan"]
        }"#;
        let record: MedicalRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.birthdate, NaiveDate::from_ymd_opt(1984, 3, 6));
    }

    #[test]
    fn birthdate_accepts_null_and_missing() {
        let with_null = r#"{
            "firstName": "A",
            "lastName": "B",
            "birthdate": null,
            "medications": [],
            "allergies": []
        }"#;
        let record: MedicalRecord = serde_json::from_str(with_null).unwrap();
        assert_eq!(record.birthdate, None);

        let missing = r#"{
            "firstName": "A",
            "lastName": "B",
            "medications": [],
            "allergies": []
        }"#;
        let record: MedicalRecord = serde_json::from_str(missing).unwrap();
        assert_eq!(record.birthdate, None);
    }

    #[test]
    fn birthdate_rejects_unknown_spelling() {
        let raw = r#"{
            "firstName": "A",
            "lastName": "B",
            "birthdate": "1984-03-06",
            "medications": [],
            "allergies": []
        }"#;
        assert!(serde_json::from_str::<MedicalRecord>(raw).is_err());
    }

    #[test]
    fn birthdate_round_trips_through_json() {
        let record = MedicalRecord {
            first_name: "John".to_string(),
            last_name: "Boyd".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1984, 3, 6),
            medications: vec![],
            allergies: vec![],
        };
        let rendered = serde_json::to_string(&record).unwrap();
        assert!(rendered.contains("\"03/06/1984\""));
    }
}
