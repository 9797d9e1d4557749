use daybrief_core::{Config, GoogleCalendar};

use super::{format_time, parse_local_time, CliError};

pub fn run(start: &str, end: &str, description: &str) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = config.today()?;

    let start = parse_local_time(start, date, tz)?;
    let end = parse_local_time(end, date, tz)?;

    let calendar = GoogleCalendar::new()?;
    let event = calendar.create_commute_block(start, end, description, tz)?;

    println!("✅ Commute block created");
    println!(
        "   Time: {} - {}",
        format_time(event.start, tz),
        format_time(event.end, tz)
    );

    Ok(())
}
