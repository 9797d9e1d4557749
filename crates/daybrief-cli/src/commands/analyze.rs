use daybrief_core::{suggest_focus_blocks, Config, GoogleCalendar, ScheduleAnalyzer};

use super::{format_duration, format_time, parse_date_arg, CliError};

pub fn run(date: Option<&str>, json: bool) -> Result<(), CliError> {
    let config = Config::load_or_default();
    let tz = config.timezone()?;
    let date = parse_date_arg(date, &config)?;

    let calendar = GoogleCalendar::new()?;
    let events = calendar.events_for_date(date, tz, false)?;

    let window = config.work_window_for(date)?;
    let analyzer = ScheduleAnalyzer::new()
        .with_back_to_back_threshold(config.analysis.back_to_back_threshold_minutes);
    let analysis = analyzer.analyze(&events, &window)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("\n📊 Schedule Analysis for {date}");
    println!("{}", "=".repeat(60));
    println!("Meetings: {}", analysis.meeting_count);
    println!("Busy Time: {}", format_duration(analysis.busy_minutes));
    println!("Focus Time: {}", format_duration(analysis.focus_minutes));
    println!("Free Time: {}", format_duration(analysis.free_minutes));
    println!("Back-to-back Meetings: {}", analysis.back_to_back_count);
    if analysis.declined_count > 0 {
        println!("Declined (excluded): {}", analysis.declined_count);
    }

    let candidates = suggest_focus_blocks(&analysis, config.analysis.min_focus_block_minutes);
    if !candidates.is_empty() {
        println!("\n🆓 Available Time Blocks:");
        for block in candidates {
            println!(
                "   {} - {} ({})",
                format_time(block.start, tz),
                format_time(block.end, tz),
                format_duration(block.duration_minutes())
            );
        }
    }

    Ok(())
}
