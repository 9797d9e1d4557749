//! Provider-neutral calendar event types.
//!
//! The Google client maps Calendar API responses onto these types; the
//! analysis and ranking engines work exclusively with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::{COMMUTE_MARKER, FOCUS_MARKER};
use crate::error::ValidationError;

/// Your response status for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    NeedsAction,
}

impl ResponseStatus {
    /// Wire value used by the Calendar API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ResponseStatus::Accepted => "accepted",
            ResponseStatus::Declined => "declined",
            ResponseStatus::Tentative => "tentative",
            ResponseStatus::NeedsAction => "needsAction",
        }
    }

    /// Parse a wire value. Unknown values default to Accepted.
    pub fn from_api_str(s: &str) -> Self {
        match s {
            "declined" => ResponseStatus::Declined,
            "tentative" => ResponseStatus::Tentative,
            "needsAction" => ResponseStatus::NeedsAction,
            _ => ResponseStatus::Accepted,
        }
    }
}

/// An event attendee (also used for the organizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    /// Email address
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// This attendee's response status
    pub response_status: Option<ResponseStatus>,
    /// Whether this attendee entry is the calendar owner
    #[serde(default)]
    pub is_self: bool,
    /// Whether this attendee organized the event
    #[serde(default)]
    pub organizer: bool,
}

impl Attendee {
    /// Domain part of the attendee's email address, lowercased.
    pub fn domain(&self) -> Option<String> {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_lowercase())
    }
}

/// A calendar event for one day.
///
/// Events with `start == end` are zero-duration markers and are excluded
/// from busy-time computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ResponseStatus,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Whether the calendar owner organized this event
    #[serde(default)]
    pub organized_by_me: bool,
    /// Whether the event carries a video-conference link
    #[serde(default)]
    pub has_meeting_link: bool,
}

impl CalendarEvent {
    /// Minimal constructor: accepted, no attendees or metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            status: ResponseStatus::Accepted,
            location: None,
            description: None,
            attendees: Vec::new(),
            organized_by_me: false,
            has_meeting_link: false,
        }
    }

    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Zero-duration marker events carry no busy time.
    pub fn is_zero_duration(&self) -> bool {
        self.start == self.end
    }

    /// Whether this is a focus block created by the assistant.
    pub fn is_focus_block(&self) -> bool {
        self.title.contains("Focus Block") || self.title.contains(FOCUS_MARKER)
    }

    /// Whether this is a commute/buffer block created by the assistant.
    pub fn is_commute(&self) -> bool {
        self.title.contains("Commute") || self.title.contains(COMMUTE_MARKER)
    }

    /// Number of attendees. Missing metadata counts as zero.
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Whether any attendee's email domain falls outside the configured
    /// internal domains. With no internal domains configured there is no
    /// basis for the distinction, so the answer is false.
    pub fn has_external_attendees(&self, internal_domains: &[String]) -> bool {
        if internal_domains.is_empty() {
            return false;
        }
        self.attendees.iter().any(|a| match a.domain() {
            Some(domain) => !internal_domains
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&domain)),
            None => false,
        })
    }

    /// Check if this event overlaps with a time range.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Reject events whose end precedes their start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::MalformedEvent {
                id: self.id.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn attendee(email: &str) -> Attendee {
        Attendee {
            email: email.to_string(),
            display_name: None,
            response_status: None,
            is_self: false,
            organizer: false,
        }
    }

    #[test]
    fn duration_and_zero_duration() {
        let event = CalendarEvent::new("1", "Standup", at(9, 0), at(9, 30));
        assert_eq!(event.duration_minutes(), 30);
        assert!(!event.is_zero_duration());

        let marker = CalendarEvent::new("2", "Reminder", at(9, 0), at(9, 0));
        assert!(marker.is_zero_duration());
    }

    #[test]
    fn malformed_event_is_rejected() {
        let event = CalendarEvent::new("1", "Backwards", at(10, 0), at(9, 0));
        assert!(matches!(
            event.validate(),
            Err(ValidationError::MalformedEvent { .. })
        ));
    }

    #[test]
    fn block_markers_are_detected() {
        let focus = CalendarEvent::new("1", "🎯 Focus Block: Writing", at(9, 0), at(11, 0));
        assert!(focus.is_focus_block());
        assert!(!focus.is_commute());

        let commute = CalendarEvent::new("2", "🚗 Commute", at(8, 0), at(9, 0));
        assert!(commute.is_commute());

        let meeting = CalendarEvent::new("3", "Team Sync", at(9, 0), at(10, 0));
        assert!(!meeting.is_focus_block());
        assert!(!meeting.is_commute());
    }

    #[test]
    fn external_attendees_require_configured_domains() {
        let mut event = CalendarEvent::new("1", "Review", at(9, 0), at(10, 0));
        event.attendees = vec![attendee("alice@corp.example"), attendee("bob@other.example")];

        let internal = vec!["corp.example".to_string()];
        assert!(event.has_external_attendees(&internal));

        let both = vec!["corp.example".to_string(), "other.example".to_string()];
        assert!(!event.has_external_attendees(&both));

        // No configured domains: nothing is external.
        assert!(!event.has_external_attendees(&[]));
    }

    #[test]
    fn response_status_roundtrip() {
        assert_eq!(ResponseStatus::from_api_str("declined"), ResponseStatus::Declined);
        assert_eq!(ResponseStatus::from_api_str("needsAction"), ResponseStatus::NeedsAction);
        // Unknown values fall back to accepted.
        assert_eq!(ResponseStatus::from_api_str("mystery"), ResponseStatus::Accepted);
        assert_eq!(ResponseStatus::Tentative.as_api_str(), "tentative");
    }
}
