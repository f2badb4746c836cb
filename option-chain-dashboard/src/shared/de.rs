//! Lenient deserializers for backend timestamps.
//!
//! The analytics backend is not consistent about timestamp formats: values produced with
//! `isoformat()` carry no offset, while values passed through Flask's `jsonify` use the
//! HTTP-date format, and NSE quotes are stamped like `05-Jan-2024 15:30:00`. All of them are
//! normalised to UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    // NSE
    "%d-%b-%Y %H:%M:%S",
];

/// Parse a timestamp in RFC 3339, naive ISO-8601 or NSE (assumed UTC) or RFC 2822 form.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Some(time.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
    {
        return Some(naive.and_utc());
    }

    DateTime::parse_from_rfc2822(input)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Deserialize a required timestamp using [`parse_timestamp`].
pub fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
}

/// Deserialize an optional timestamp, treating unparseable values as absent.
pub fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| parse_timestamp(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        struct TestCase {
            input: &'static str,
            expected: Option<DateTime<Utc>>,
        }

        let ten_fifteen = Utc.with_ymd_and_hms(2024, 1, 5, 10, 15, 0).unwrap();

        let tests = vec![
            TestCase {
                // TC0: RFC 3339 with offset
                input: "2024-01-05T15:45:00+05:30",
                expected: Some(ten_fifteen),
            },
            TestCase {
                // TC1: naive isoformat() output
                input: "2024-01-05T10:15:00",
                expected: Some(ten_fifteen),
            },
            TestCase {
                // TC2: naive with space separator
                input: "2024-01-05 10:15:00",
                expected: Some(ten_fifteen),
            },
            TestCase {
                // TC3: HTTP-date from jsonify
                input: "Fri, 05 Jan 2024 10:15:00 GMT",
                expected: Some(ten_fifteen),
            },
            TestCase {
                // TC4: NSE quote timestamp
                input: "05-Jan-2024 10:15:00",
                expected: Some(ten_fifteen),
            },
            TestCase {
                // TC5: garbage
                input: "yesterday",
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = parse_timestamp(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_parse_timestamp_keeps_fraction() {
        let actual = parse_timestamp("2024-01-05T10:15:00.250000").unwrap();
        assert_eq!(actual.timestamp_subsec_millis(), 250);
    }
}
