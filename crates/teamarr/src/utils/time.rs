//! Time offset and timezone-string utilities used by XMLTV generation.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

/// Parse a time offset string like "+1h30m", "-45m", "+5s", "0"
pub fn parse_time_offset(offset_str: &str) -> Result<i32, String> {
    let offset_str = offset_str.trim();

    if offset_str == "0" || offset_str.is_empty() {
        return Ok(0);
    }

    let re = Regex::new(r"^([+-]?)(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$")
        .map_err(|e| format!("Invalid regex: {e}"))?;

    let caps = re.captures(offset_str).ok_or_else(|| {
        format!(
            "Invalid time offset format: '{offset_str}'. Expected format like '+1h30m', '-45m', '+5s', or '0'"
        )
    })?;

    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("-") => -1,
        _ => 1,
    };

    let hours: i32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let minutes: i32 = caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let seconds: i32 = caps.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);

    if hours > 23 {
        return Err(format!("Hour offset too large: {hours}h. Maximum allowed is 23h"));
    }
    if minutes > 59 {
        return Err(format!("Minute offset too large: {minutes}m. Maximum allowed is 59m"));
    }
    if seconds > 59 {
        return Err(format!("Second offset too large: {seconds}s. Maximum allowed is 59s"));
    }

    let total_seconds = (hours * 3600) + (minutes * 60) + seconds;
    if total_seconds > 86400 {
        return Err(format!(
            "Total time offset too large: {total_seconds}s. Maximum allowed is +-24 hours"
        ));
    }

    Ok(sign * total_seconds)
}

/// Apply a time offset in seconds to a DateTime
pub fn apply_time_offset(dt: DateTime<Utc>, offset_seconds: i32) -> DateTime<Utc> {
    if offset_seconds == 0 {
        return dt;
    }
    if offset_seconds > 0 {
        dt + chrono::Duration::seconds(offset_seconds as i64)
    } else {
        dt - chrono::Duration::seconds((-offset_seconds) as i64)
    }
}

/// Validate a timezone string: either a named IANA timezone or a fixed
/// UTC offset like "+01:00"/"+0100".
pub fn validate_timezone(tz_str: &str) -> Result<String, String> {
    if tz_str.parse::<Tz>().is_ok() {
        return Ok(tz_str.to_string());
    }

    if parse_fixed_offset(tz_str).is_ok() {
        return Ok(tz_str.to_string());
    }

    Err(format!(
        "Invalid timezone: '{tz_str}'. Use either a named timezone (e.g., 'Europe/London') or UTC offset (e.g., '+01:00')"
    ))
}

fn parse_fixed_offset(offset_str: &str) -> Result<FixedOffset, String> {
    let offset_str = offset_str.trim();

    let re = Regex::new(r"^([+-])(\d{2}):?(\d{2})$").map_err(|e| format!("Regex error: {e}"))?;
    let caps = re
        .captures(offset_str)
        .ok_or_else(|| format!("Invalid offset format: '{offset_str}'"))?;

    let sign = if caps.get(1).unwrap().as_str() == "+" { 1 } else { -1 };
    let hours: i32 = caps.get(2).unwrap().as_str().parse().map_err(|_| "Invalid hours in offset")?;
    let minutes: i32 = caps.get(3).unwrap().as_str().parse().map_err(|_| "Invalid minutes in offset")?;

    if hours > 23 || minutes > 59 {
        return Err("Invalid time values in offset".to_string());
    }

    let total_seconds = sign * (hours * 3600 + minutes * 60);
    FixedOffset::east_opt(total_seconds).ok_or_else(|| "Invalid timezone offset".to_string())
}

/// Local midnight at the start of `date` in `tz_str`, converted to UTC.
/// `tz_str` must already have passed [`validate_timezone`]; an offset that
/// fails to parse falls back to UTC midnight rather than panicking.
pub fn local_midnight_utc(tz_str: &str, date: chrono::NaiveDate) -> DateTime<Utc> {
    let midnight = NaiveTime::from_hms_opt(0, 0, 0).expect("valid midnight");
    let naive_midnight = date.and_time(midnight);

    if let Ok(tz) = tz_str.parse::<Tz>() {
        return tz
            .from_local_datetime(&naive_midnight)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive_midnight))
            .with_timezone(&Utc);
    }

    if let Ok(offset) = parse_fixed_offset(tz_str) {
        return offset
            .from_local_datetime(&naive_midnight)
            .earliest()
            .unwrap_or_else(|| offset.from_utc_datetime(&naive_midnight))
            .with_timezone(&Utc);
    }

    naive_midnight.and_utc()
}

/// The calendar date `dt` falls on in `tz_str`. Used to evaluate lead-time
/// windows against the group's local day rather than its UTC day.
pub fn local_date(tz_str: &str, dt: DateTime<Utc>) -> chrono::NaiveDate {
    if let Ok(tz) = tz_str.parse::<Tz>() {
        return dt.with_timezone(&tz).date_naive();
    }
    if let Ok(offset) = parse_fixed_offset(tz_str) {
        return dt.with_timezone(&offset).date_naive();
    }
    dt.date_naive()
}

/// Format a UTC instant as an XMLTV timestamp: `YYYYMMDDHHMMSS +0000`.
pub fn format_xmltv_timestamp(dt: DateTime<Utc>) -> String {
    format!("{} +0000", dt.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_offset() {
        assert_eq!(parse_time_offset("0").unwrap(), 0);
        assert_eq!(parse_time_offset("").unwrap(), 0);
        assert_eq!(parse_time_offset("+1h30m").unwrap(), 5400);
        assert_eq!(parse_time_offset("-45m").unwrap(), -2700);
        assert_eq!(parse_time_offset("+5s").unwrap(), 5);

        assert!(parse_time_offset("invalid").is_err());
        assert!(parse_time_offset("25h").is_err());
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Europe/London").is_ok());
        assert!(validate_timezone("+01:00").is_ok());
        assert!(validate_timezone("Invalid/Timezone").is_err());
    }

    #[test]
    fn test_local_midnight_utc() {
        use chrono::NaiveDate;
        let date = NaiveDate::from_ymd_opt(2026, 7, 27).unwrap();

        // New York is UTC-4 in July (DST); local midnight is 04:00 UTC.
        let ny_midnight = local_midnight_utc("America/New_York", date);
        assert_eq!(ny_midnight.format("%Y-%m-%d %H:%M").to_string(), "2026-07-27 04:00");

        let fixed_offset_midnight = local_midnight_utc("+02:00", date);
        assert_eq!(
            fixed_offset_midnight.format("%Y-%m-%d %H:%M").to_string(),
            "2026-07-26 22:00"
        );

        let utc_midnight = local_midnight_utc("UTC", date);
        assert_eq!(utc_midnight.format("%Y-%m-%d %H:%M").to_string(), "2026-07-27 00:00");
    }

    #[test]
    fn test_local_date() {
        let just_after_utc_midnight = DateTime::parse_from_rfc3339("2026-07-27T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        // Still the 26th in New York (UTC-4 in July).
        assert_eq!(
            local_date("America/New_York", just_after_utc_midnight).to_string(),
            "2026-07-26"
        );
        assert_eq!(local_date("UTC", just_after_utc_midnight).to_string(), "2026-07-27");
    }

    #[test]
    fn test_format_xmltv_timestamp() {
        let dt = DateTime::parse_from_rfc3339("2026-07-27T19:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_xmltv_timestamp(dt), "20260727190000 +0000");
    }
}
