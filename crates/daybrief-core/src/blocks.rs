//! Time-block vocabulary: focus and commute blocks.
//!
//! The assistant marks the events it creates with a title marker so they
//! can be told apart from real meetings in analysis and ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, FreeBlock};

/// Title marker for assistant-created focus blocks.
pub const FOCUS_MARKER: &str = "🎯";
/// Title marker for assistant-created commute blocks.
pub const COMMUTE_MARKER: &str = "🚗";

/// Calendar color ids used for assistant-created events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventColor {
    /// Focus time
    Blue,
    /// Commute/buffer
    Gray,
    /// Critical
    Red,
    /// Available
    Green,
    /// Tentative
    Yellow,
}

impl EventColor {
    /// Provider color id.
    pub fn id(&self) -> &'static str {
        match self {
            EventColor::Blue => "9",
            EventColor::Gray => "8",
            EventColor::Red => "11",
            EventColor::Green => "10",
            EventColor::Yellow => "5",
        }
    }
}

/// A request to create a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub color: Option<EventColor>,
    /// Popup reminder lead time in minutes
    pub reminder_minutes: i64,
}

impl NewEvent {
    /// Create a new event request with a 5-minute popup reminder.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            description: None,
            location: None,
            color: None,
            reminder_minutes: 5,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the display color.
    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the reminder lead time.
    pub fn with_reminder(mut self, minutes: i64) -> Self {
        self.reminder_minutes = minutes;
        self
    }
}

/// Build a focus-block creation request.
pub fn focus_block(
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    description: Option<&str>,
) -> NewEvent {
    let description = description
        .map(str::to_string)
        .unwrap_or_else(|| format!("Deep work session on {title}"));
    NewEvent::new(format!("{FOCUS_MARKER} Focus Block: {title}"), start, end)
        .with_description(description)
        .with_color(EventColor::Blue)
        .with_reminder(5)
}

/// Build a commute-block creation request.
pub fn commute_block(start: DateTime<Utc>, end: DateTime<Utc>, description: &str) -> NewEvent {
    NewEvent::new(format!("{COMMUTE_MARKER} Commute"), start, end)
        .with_description(description)
        .with_color(EventColor::Gray)
        .with_reminder(10)
}

/// Free blocks long enough to host a focus session.
pub fn suggest_focus_blocks(analysis: &AnalysisResult, min_minutes: i64) -> Vec<FreeBlock> {
    analysis
        .free_blocks
        .iter()
        .filter(|block| block.duration_minutes() >= min_minutes)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    #[test]
    fn focus_block_carries_marker_and_color() {
        let block = focus_block("Writing", at(9, 0), at(11, 0), None);
        assert_eq!(block.title, "🎯 Focus Block: Writing");
        assert_eq!(block.color, Some(EventColor::Blue));
        assert_eq!(block.reminder_minutes, 5);
        assert_eq!(block.description.as_deref(), Some("Deep work session on Writing"));
    }

    #[test]
    fn commute_block_defaults() {
        let block = commute_block(at(8, 30), at(9, 0), "Travel time");
        assert_eq!(block.title, "🚗 Commute");
        assert_eq!(block.color, Some(EventColor::Gray));
        assert_eq!(block.reminder_minutes, 10);
    }

    #[test]
    fn color_ids_match_provider_palette() {
        assert_eq!(EventColor::Blue.id(), "9");
        assert_eq!(EventColor::Gray.id(), "8");
        assert_eq!(EventColor::Red.id(), "11");
        assert_eq!(EventColor::Green.id(), "10");
        assert_eq!(EventColor::Yellow.id(), "5");
    }
}
