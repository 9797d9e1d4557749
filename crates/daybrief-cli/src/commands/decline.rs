use daybrief_core::{CalendarError, Config, GoogleCalendar};

use super::{format_time, CliError};

pub fn run(title: &str, no_notify: bool) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = config.today()?;

    let calendar = GoogleCalendar::new()?;
    let event = calendar
        .find_event_by_title(title, date, tz)?
        .ok_or_else(|| CalendarError::EventNotFound(title.to_string()))?;

    calendar.decline_event(&event.id, !no_notify)?;

    println!("✅ Declined: {}", event.title);
    println!(
        "   Time: {} - {}",
        format_time(event.start, tz),
        format_time(event.end, tz)
    );
    if !no_notify {
        println!("   Notification sent to attendees");
    }

    Ok(())
}
