//! Parsing and formatting of human durations.
//!
//! Commands accept compact durations like `1d2h30m` (reminders, timeouts, repeaters)
//! and clock positions like `1:30` (music seek).

use chrono::Duration;

use crate::error::time::TimeParseError;

/// Parses a compact duration made of `<number><unit>` pairs.
///
/// Units are `s`, `m`, `h`, `d` and `w`; whitespace between pairs is ignored.
///
/// # Arguments
/// - `input` - User input such as `1d2h30m` or `90s`
/// - `max` - Longest duration accepted
///
/// # Returns
/// - `Ok(Duration)` - Sum of all pairs
/// - `Err(TimeParseError)` - Empty, malformed, zero or longer than `max`
pub fn parse_duration(input: &str, max: Duration) -> Result<Duration, TimeParseError> {
    let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if input.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let mut total = Duration::zero();
    let mut number = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }

        if number.is_empty() {
            return Err(TimeParseError::InvalidNumber(c.to_string()));
        }
        let value: i64 = number
            .parse()
            .map_err(|_| TimeParseError::InvalidNumber(number.clone()))?;
        number.clear();

        let part = match c.to_ascii_lowercase() {
            's' => Duration::try_seconds(value),
            'm' => Duration::try_minutes(value),
            'h' => Duration::try_hours(value),
            'd' => Duration::try_days(value),
            'w' => Duration::try_weeks(value),
            other => return Err(TimeParseError::InvalidUnit(other)),
        }
        .ok_or_else(|| TimeParseError::TooLong(format_duration(max)))?;

        total = total
            .checked_add(&part)
            .ok_or_else(|| TimeParseError::TooLong(format_duration(max)))?;
    }

    if !number.is_empty() {
        return Err(TimeParseError::MissingUnit);
    }
    if total <= Duration::zero() {
        return Err(TimeParseError::Zero);
    }
    if total > max {
        return Err(TimeParseError::TooLong(format_duration(max)));
    }

    Ok(total)
}

/// Longest playback position accepted by [`parse_position`].
const POSITION_MAX_SECS: u64 = 86_400;

/// Parses a playback position: `1:30`, `1:02:03`, a plain number of seconds or a
/// compact duration like `1m30s`.
pub fn parse_position(input: &str) -> Result<std::time::Duration, TimeParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let too_long = || TimeParseError::TooLong(format_duration(Duration::days(1)));

    let seconds = if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() > 3 {
            return Err(TimeParseError::InvalidNumber(input.to_string()));
        }

        let mut seconds: u64 = 0;
        for part in parts {
            let value: u64 = part
                .parse()
                .map_err(|_| TimeParseError::InvalidNumber(part.to_string()))?;
            seconds = seconds
                .checked_mul(60)
                .and_then(|s| s.checked_add(value))
                .ok_or_else(too_long)?;
        }
        seconds
    } else if let Ok(seconds) = input.parse::<u64>() {
        seconds
    } else {
        parse_duration(input, Duration::days(1))?.num_seconds() as u64
    };

    if seconds > POSITION_MAX_SECS {
        return Err(too_long());
    }

    Ok(std::time::Duration::from_secs(seconds))
}

/// Formats a duration as `1d 2h 30m`, dropping zero parts.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Formats a track position in milliseconds as `m:ss` or `h:mm:ss`.
pub fn format_track_time(millis: u64) -> String {
    let total = millis / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_combined_units() {
        let parsed = parse_duration("1d2h30m", Duration::days(365)).unwrap();
        assert_eq!(parsed, Duration::days(1) + Duration::hours(2) + Duration::minutes(30));
    }

    #[test]
    fn ignores_whitespace_and_case() {
        let parsed = parse_duration("1H 15M", Duration::days(1)).unwrap();
        assert_eq!(parsed, Duration::minutes(75));
    }

    #[test]
    fn rejects_malformed_input() {
        let max = Duration::days(1);
        assert_eq!(parse_duration("", max), Err(TimeParseError::Empty));
        assert_eq!(parse_duration("10", max), Err(TimeParseError::MissingUnit));
        assert_eq!(parse_duration("5x", max), Err(TimeParseError::InvalidUnit('x')));
        assert_eq!(parse_duration("0m", max), Err(TimeParseError::Zero));
        assert!(matches!(parse_duration("h", max), Err(TimeParseError::InvalidNumber(_))));
    }

    #[test]
    fn rejects_durations_over_max() {
        let result = parse_duration("2d", Duration::days(1));
        assert_eq!(result, Err(TimeParseError::TooLong("1d".to_string())));
    }

    #[test]
    fn parses_positions() {
        assert_eq!(parse_position("1:30").unwrap().as_secs(), 90);
        assert_eq!(parse_position("1:02:03").unwrap().as_secs(), 3723);
        assert_eq!(parse_position("45").unwrap().as_secs(), 45);
        assert_eq!(parse_position("2m5s").unwrap().as_secs(), 125);
        assert!(parse_position("1:xx").is_err());
    }

    #[test]
    fn rejects_positions_past_a_day() {
        let too_long = Err(TimeParseError::TooLong("1d".to_string()));
        assert_eq!(parse_position("99999999999999999:59:59"), too_long);
        assert_eq!(parse_position("18446744073709551615:00"), too_long);
        assert_eq!(parse_position("90000"), too_long);
        assert_eq!(parse_position("24:00:00").unwrap().as_secs(), 86_400);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(Duration::minutes(90)), "1h 30m");
        assert_eq!(format_duration(Duration::days(28)), "28d");
        assert_eq!(format_duration(Duration::zero()), "0s");
    }

    #[test]
    fn formats_track_times() {
        assert_eq!(format_track_time(65_000), "1:05");
        assert_eq!(format_track_time(3_725_000), "1:02:05");
    }
}
