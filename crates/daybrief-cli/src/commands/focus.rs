use daybrief_core::{Config, GoogleCalendar};

use super::{format_duration, format_time, parse_local_time, CliError};

pub fn run(title: &str, start: &str, end: &str, description: Option<&str>) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = config.today()?;

    let start = parse_local_time(start, date, tz)?;
    let end = parse_local_time(end, date, tz)?;

    let calendar = GoogleCalendar::new()?;
    let event = calendar.create_focus_block(title, start, end, description, tz)?;

    println!("✅ Focus block created: {}", event.title);
    println!(
        "   Time: {} - {}",
        format_time(event.start, tz),
        format_time(event.end, tz)
    );
    println!("   Duration: {}", format_duration(event.duration_minutes()));

    Ok(())
}
