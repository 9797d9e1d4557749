use daybrief_core::{CalendarEvent, Config, GoogleCalendar, MeetingRanker, PriorityTier};

use super::{format_time, parse_date_arg, CliError};

pub fn run(date: Option<&str>, json: bool) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = parse_date_arg(date, &config)?;

    let calendar = GoogleCalendar::new()?;
    let events = calendar.events_for_date(date, tz, false)?;

    // The assistant's own blocks are not meetings to rank.
    let meetings: Vec<CalendarEvent> = events
        .into_iter()
        .filter(|e| !e.is_focus_block() && !e.is_commute())
        .collect();

    let ranker = MeetingRanker::new(config.ranking_rules());
    let ranking = ranker.rank(&meetings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!("\n📊 Meeting Priority Rankings");
    println!("{}", "=".repeat(60));

    let categories = [
        ("🔴 Critical - Do Not Cancel", PriorityTier::Critical),
        ("🟡 Important - Try to Keep", PriorityTier::Important),
        ("🟢 Moderate - Can Reschedule", PriorityTier::Moderate),
        ("🔵 Cancel Candidates", PriorityTier::Cancelable),
    ];

    for (heading, tier) in categories {
        let events = ranking.tier(tier);
        if !events.is_empty() {
            println!("\n{heading}:");
            for event in events {
                println!("   • {} - {}", format_time(event.start, tz), event.title);
            }
        }
    }

    Ok(())
}
