//! CLI subcommands and shared rendering helpers.

pub mod analyze;
pub mod auth;
pub mod commute;
pub mod config;
pub mod decline;
pub mod focus;
pub mod rank;
pub mod reschedule;
pub mod today;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use daybrief_core::{Config, ResponseStatus};

pub type CliError = Box<dyn std::error::Error>;

/// Format an instant as a local 12-hour clock time.
pub fn format_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%-I:%M %p").to_string()
}

/// Format a duration in minutes as "2h 30m".
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        if mins > 0 {
            format!("{hours}h {mins}m")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{mins}m")
    }
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today in the
/// configured timezone.
pub fn parse_date_arg(date: Option<&str>, config: &Config) -> Result<NaiveDate, CliError> {
    match date {
        Some(s) => Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))?),
        None => Ok(config.today()?),
    }
}

/// Parse an HH:MM argument into a UTC instant on the given date.
pub fn parse_local_time(time: &str, date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, CliError> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| format!("invalid time '{time}', expected HH:MM"))?;
    tz.from_local_datetime(&date.and_time(parsed))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{date} {time} does not exist in {tz}").into())
}

/// Status icon for an event.
pub fn status_icon(status: ResponseStatus) -> &'static str {
    match status {
        ResponseStatus::Accepted => "✅",
        ResponseStatus::Declined => "❌",
        ResponseStatus::Tentative => "❓",
        ResponseStatus::NeedsAction => "⏳",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(20), "20m");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(150), "2h 30m");
        assert_eq!(format_duration(0), "0m");
    }

    #[test]
    fn time_formatting_is_local_12_hour() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 2, 4, 30, 0).unwrap();
        assert_eq!(format_time(instant, chrono_tz::Asia::Kolkata), "10:00 AM");
        assert_eq!(format_time(instant, chrono_tz::UTC), "4:30 AM");
    }

    #[test]
    fn date_arg_parsing() {
        let config = Config::default();
        let date = parse_date_arg(Some("2025-06-02"), &config).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(parse_date_arg(Some("junk"), &config).is_err());
    }

    #[test]
    fn local_time_parsing() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let instant = parse_local_time("10:00", date, chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 6, 2, 4, 30, 0).unwrap());
        assert!(parse_local_time("26:00", date, chrono_tz::UTC).is_err());
    }
}
