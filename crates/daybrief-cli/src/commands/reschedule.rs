use chrono::Duration;
use daybrief_core::{CalendarError, Config, GoogleCalendar};

use super::{format_time, CliError};

pub fn run(
    title: &str,
    shift_minutes: i64,
    message: Option<&str>,
    no_notify: bool,
) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = config.today()?;

    let calendar = GoogleCalendar::new()?;
    let event = calendar
        .find_event_by_title(title, date, tz)?
        .ok_or_else(|| CalendarError::EventNotFound(title.to_string()))?;

    let new_start = event.start + Duration::minutes(shift_minutes);
    let new_end = event.end + Duration::minutes(shift_minutes);

    let updated =
        calendar.reschedule_event(&event.id, new_start, new_end, message, !no_notify, tz)?;

    println!("✅ Rescheduled: {}", event.title);
    println!(
        "   Old time: {} - {}",
        format_time(event.start, tz),
        format_time(event.end, tz)
    );
    println!(
        "   New time: {} - {}",
        format_time(updated.start, tz),
        format_time(updated.end, tz)
    );
    if let Some(message) = message {
        println!("   Message: {message}");
    }

    Ok(())
}
