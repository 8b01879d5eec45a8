//! Calendar-aware age calculation.

use chrono::{Datelike, NaiveDate};

/// Returns whole years elapsed between `birthdate` and `today`.
///
/// Uses calendar subtraction (not days / 365): the year difference is reduced
/// by one when today's (month, day) precedes the birthday's. Returns `0` when
/// the birthdate is absent or lies in the future; callers that must tell
/// "age 0" apart from "unknown age" have to inspect the birthdate themselves.
pub fn age_on(birthdate: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(birth) = birthdate else {
        return 0;
    };
    if birth > today {
        return 0;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years as u32
}
