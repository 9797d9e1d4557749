use daybrief_core::{Config, GoogleCalendar};

use super::{format_duration, format_time, parse_date_arg, status_icon, CliError};

pub fn run(all: bool, date: Option<&str>) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = parse_date_arg(date, &config)?;

    let calendar = GoogleCalendar::new()?;
    let events = calendar.events_for_date(date, tz, all)?;

    if events.is_empty() {
        println!("No events scheduled for {date}.");
        return Ok(());
    }

    println!("\n📅 Schedule for {}", date.format("%A, %B %-d, %Y"));
    println!("{}", "=".repeat(60));

    for event in &events {
        let time_str = format!(
            "{} - {}",
            format_time(event.start, tz),
            format_time(event.end, tz)
        );
        println!(
            "\n{} {} ({})",
            status_icon(event.status),
            time_str,
            format_duration(event.duration_minutes())
        );
        println!("   {}", event.title);
        if let Some(location) = &event.location {
            println!("   📍 {location}");
        }
        if event.has_meeting_link {
            println!("   🔗 Virtual Meeting");
        }
    }

    Ok(())
}
