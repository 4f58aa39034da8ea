use crate::error::FormatError;
use time::{
    format_description::well_known::{Iso8601, Rfc2822, Rfc3339},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

const MINUTE: i64 = 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;

/// Parse a timestamp as served by the rain API.
///
/// Accepts RFC 3339, ISO 8601 (with or without an offset, or a bare date) and RFC 2822.
/// Values without an offset are taken to be UTC.
pub fn parse_timestamp(timestamp: &str) -> Result<OffsetDateTime, FormatError> {
    let s = timestamp.trim();
    OffsetDateTime::parse(s, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(s, &Iso8601::PARSING))
        .or_else(|_| OffsetDateTime::parse(s, &Rfc2822))
        .or_else(|_| PrimitiveDateTime::parse(s, &Iso8601::PARSING).map(|x| x.assume_utc()))
        .or_else(|_| Date::parse(s, &Iso8601::DATE).map(|x| x.midnight().assume_utc()))
        .map_err(|_| FormatError::InvalidTimestamp {
            value: timestamp.to_string(),
        })
}

/// Coarse label of the time elapsed between `past` and `now`, eg `"3 hours"`.
///
/// Future timestamps are clamped to zero elapsed.
pub fn elapsed_label(past: &str, now: OffsetDateTime) -> Result<String, FormatError> {
    let past = parse_timestamp(past)?;
    Ok(seconds_to_label((now - past).whole_seconds()))
}

/// Bucket a number of seconds into `<1 hour`, whole hours, or whole days.
pub fn seconds_to_label(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < HOUR {
        return "<1 hour".to_string();
    }

    let (n, unit) = if seconds < DAY {
        (seconds / HOUR, "hour")
    } else {
        (seconds / DAY, "day")
    };

    match n {
        1 => format!("1 {unit}"),
        n => format!("{n} {unit}s"),
    }
}

/// Long form date in the timestamp's own offset, eg `"March 04 2024"`.
pub fn calendar_date_label(timestamp: &str) -> Result<String, FormatError> {
    parse_timestamp(timestamp)?
        .format(format_description!("[month repr:long] [day] [year]"))
        .map_err(|_| FormatError::InvalidTimestamp {
            value: timestamp.to_string(),
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::ArbitraryDateTime;
    use time::macros::datetime;

    fn invalid(value: &str) -> FormatError {
        FormatError::InvalidTimestamp {
            value: value.to_string(),
        }
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(seconds_to_label(0), "<1 hour");
        assert_eq!(seconds_to_label(3599), "<1 hour");
        assert_eq!(seconds_to_label(3600), "1 hour");
        assert_eq!(seconds_to_label(7199), "1 hour");
        assert_eq!(seconds_to_label(7200), "2 hours");
        assert_eq!(seconds_to_label(86399), "23 hours");
        assert_eq!(seconds_to_label(86400), "1 day");
        assert_eq!(seconds_to_label(172799), "1 day");
        assert_eq!(seconds_to_label(172800), "2 days");
        assert_eq!(seconds_to_label(DAY * 400), "400 days");
    }

    #[test]
    fn negative_seconds_clamp() {
        assert_eq!(seconds_to_label(-1), "<1 hour");
        assert_eq!(seconds_to_label(-DAY * 3), "<1 hour");
        assert_eq!(seconds_to_label(i64::MIN), "<1 hour");
    }

    #[quickcheck]
    fn under_an_hour(secs: u16) -> bool {
        seconds_to_label(secs as i64 % HOUR) == "<1 hour"
    }

    #[quickcheck]
    fn whole_hours(secs: u32) -> bool {
        let secs = HOUR + secs as i64 % (DAY - HOUR);
        let label = seconds_to_label(secs);
        match secs / HOUR {
            1 => label == "1 hour",
            n => label == format!("{n} hours"),
        }
    }

    #[quickcheck]
    fn whole_days(secs: u64) -> bool {
        let secs = DAY + (secs % (i64::MAX as u64 - DAY as u64)) as i64;
        let label = seconds_to_label(secs);
        match secs / DAY {
            1 => label == "1 day",
            n => label == format!("{n} days"),
        }
    }

    #[quickcheck]
    fn future_timestamps_are_under_an_hour(now: ArbitraryDateTime, ahead: u32) -> bool {
        let now = now.0;
        let past = now + time::Duration::seconds(ahead as i64);
        let past = past.format(&Rfc3339).unwrap();
        elapsed_label(&past, now).unwrap() == "<1 hour"
    }

    #[quickcheck]
    fn elapsed_label_is_pure(past: ArbitraryDateTime, now: ArbitraryDateTime) -> bool {
        let past = past.0.format(&Rfc3339).unwrap();
        elapsed_label(&past, now.0) == elapsed_label(&past, now.0)
    }

    #[test]
    fn elapsed_from_timestamps() {
        let now = datetime!(2024-03-02 06:00 UTC);
        assert_eq!(elapsed_label("2024-03-01T00:00:00Z", now).unwrap(), "1 day");
        assert_eq!(elapsed_label("2024-03-02T05:30:00Z", now).unwrap(), "<1 hour");
        assert_eq!(elapsed_label("2024-03-02T01:00:00Z", now).unwrap(), "5 hours");
        assert_eq!(elapsed_label("2024-02-01T06:00:00Z", now).unwrap(), "30 days");
        // offsets are honoured: 05:00 at +10:00 is 19:00 the previous day in UTC
        assert_eq!(
            elapsed_label("2024-03-02T05:00:00+10:00", now).unwrap(),
            "11 hours"
        );
    }

    #[test]
    fn calendar_labels() {
        assert_eq!(
            calendar_date_label("2024-03-01T00:00:00Z").unwrap(),
            "March 01 2024"
        );
        assert_eq!(
            calendar_date_label("2024-03-04T23:59:59.123Z").unwrap(),
            "March 04 2024"
        );
        assert_eq!(
            calendar_date_label("2023-12-25T08:00:00+10:00").unwrap(),
            "December 25 2023"
        );
    }

    #[test]
    fn accepted_timestamp_forms() {
        let expected = datetime!(2024-03-01 00:00 UTC);
        for s in [
            "2024-03-01T00:00:00Z",
            "  2024-03-01T00:00:00Z\n",
            "2024-03-01T00:00:00.000Z",
            "2024-03-01T10:00:00+10:00",
            "2024-03-01T00:00:00",
            "2024-03-01",
            "Fri, 01 Mar 2024 00:00:00 +0000",
        ] {
            assert_eq!(parse_timestamp(s).unwrap(), expected, "parsing {s:?}");
        }
    }

    #[test]
    fn invalid_timestamps() {
        let now = datetime!(2024-03-02 06:00 UTC);
        for s in ["not-a-date", "", "2024-13-01", "yesterday"] {
            assert_eq!(calendar_date_label(s), Err(invalid(s)));
            assert_eq!(elapsed_label(s, now), Err(invalid(s)));
        }
    }
}
