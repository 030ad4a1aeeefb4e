//! Partition naming convention: `{parent}_pYYYYMMDD_HHMMSS`.
//!
//! The represented instant is interpreted in UTC. Decoding is anchored: the
//! whole name must match, so `events_p20230101_000000_old` or a partition of a
//! similarly-prefixed sibling table never decodes against `events`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use prunewell_core::{AppError, AppResult};

fn unrecognized(name: &str, parent_table: &str) -> AppError {
    AppError::Validation(format!(
        "partition '{name}' does not match the '{parent_table}_pYYYYMMDD_HHMMSS' naming convention"
    ))
}

fn parse_digits(text: &str) -> Option<u32> {
    text.parse().ok()
}

/// Decodes a partition name into the UTC instant it represents.
///
/// Fails when the name does not follow the convention for the given parent or
/// when the digits do not form a valid calendar date/time (month 13, day 32).
pub fn decode_partition_name(name: &str, parent_table: &str) -> AppResult<DateTime<Utc>> {
    let suffix = name
        .strip_prefix(parent_table)
        .and_then(|rest| rest.strip_prefix("_p"))
        .ok_or_else(|| unrecognized(name, parent_table))?;

    let (date_part, time_part) = suffix
        .split_once('_')
        .ok_or_else(|| unrecognized(name, parent_table))?;
    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if date_part.len() != 8 || time_part.len() != 6 || !all_digits(date_part) || !all_digits(time_part)
    {
        return Err(unrecognized(name, parent_table));
    }

    let year = parse_digits(&date_part[0..4]);
    let month = parse_digits(&date_part[4..6]);
    let day = parse_digits(&date_part[6..8]);
    let hour = parse_digits(&time_part[0..2]);
    let minute = parse_digits(&time_part[2..4]);
    let second = parse_digits(&time_part[4..6]);

    let (Some(year), Some(month), Some(day), Some(hour), Some(minute), Some(second)) =
        (year, month, day, hour, minute, second)
    else {
        return Err(unrecognized(name, parent_table));
    };

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| unrecognized(name, parent_table))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| unrecognized(name, parent_table))?;

    Ok(date.and_time(time).and_utc())
}

/// Encodes a UTC instant into the partition name for the given parent table.
#[must_use]
pub fn encode_partition_name(parent_table: &str, timestamp: DateTime<Utc>) -> String {
    format!("{parent_table}_p{}", timestamp.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::{decode_partition_name, encode_partition_name};

    #[test]
    fn decodes_conforming_name_to_utc_instant() {
        let decoded = decode_partition_name("events_p20230101_000000", "events");
        assert_eq!(
            decoded.ok(),
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single()
        );
    }

    #[test]
    fn rejects_non_conforming_names() {
        for name in [
            "events_pARCHIVE",
            "events_p2023010_000000",
            "events_p20230101_0000",
            "events_p20230101_000000_old",
            "other_p20230101_000000",
            "events_20230101_000000",
            "prefix_events_p20230101_000000",
        ] {
            assert!(
                decode_partition_name(name, "events").is_err(),
                "'{name}' should not decode"
            );
        }
    }

    #[test]
    fn rejects_invalid_calendar_values() {
        assert!(decode_partition_name("events_p20231301_000000", "events").is_err());
        assert!(decode_partition_name("events_p20230132_000000", "events").is_err());
        assert!(decode_partition_name("events_p20230101_250000", "events").is_err());
        assert!(decode_partition_name("events_p20230101_006100", "events").is_err());
    }

    #[test]
    fn anchored_against_similarly_prefixed_parent() {
        // A partition of `events_audit` must not decode against `events`.
        assert!(decode_partition_name("events_audit_p20230101_000000", "events").is_err());
    }

    #[test]
    fn encode_produces_convention_form() {
        let Some(instant) = Utc.with_ymd_and_hms(2023, 6, 15, 12, 30, 45).single() else {
            panic!("fixed instant must exist");
        };
        assert_eq!(
            encode_partition_name("events", instant),
            "events_p20230615_123045"
        );
    }

    proptest! {
        #[test]
        fn encode_then_decode_round_trips(
            year in 1i32..=9999,
            ordinal in 1u32..=365,
            seconds in 0u32..86_400,
        ) {
            let date = chrono::NaiveDate::from_yo_opt(year, ordinal);
            let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0);
            if let (Some(date), Some(time)) = (date, time) {
                let instant = date.and_time(time).and_utc();
                let name = encode_partition_name("events", instant);
                prop_assert_eq!(decode_partition_name(&name, "events").ok(), Some(instant));
            }
        }
    }
}
