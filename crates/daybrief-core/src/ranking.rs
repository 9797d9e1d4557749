//! Meeting priority ranking.
//!
//! Partitions a day's meetings into four priority tiers for downstream
//! reschedule/decline decisions. Classification is an ordered rule table:
//! rules are evaluated top to bottom and the first match wins, which makes
//! the precedence between overlapping rules explicit and testable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::{CalendarEvent, ResponseStatus};

/// Priority class for a meeting, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Critical,
    Important,
    Moderate,
    Cancelable,
}

impl PriorityTier {
    /// Fixed presentation order.
    pub const ALL: [PriorityTier; 4] = [
        PriorityTier::Critical,
        PriorityTier::Important,
        PriorityTier::Moderate,
        PriorityTier::Cancelable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::Critical => "critical",
            PriorityTier::Important => "important",
            PriorityTier::Moderate => "moderate",
            PriorityTier::Cancelable => "cancelable",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRules {
    /// Title keywords that pin a meeting to the critical tier
    #[serde(default = "default_critical_keywords")]
    pub critical_keywords: Vec<String>,
    /// Title keywords that mark a meeting as a cancel candidate
    #[serde(default = "default_cancelable_keywords")]
    pub cancelable_keywords: Vec<String>,
    /// Tentative meetings above this attendee count are cancel candidates
    #[serde(default = "default_large_meeting_attendee_threshold")]
    pub large_meeting_attendee_threshold: i32,
    /// Email domains considered internal to the user's organization
    #[serde(default)]
    pub internal_domains: Vec<String>,
}

fn default_critical_keywords() -> Vec<String> {
    ["production", "deploy", "leads", "epd", "gtm", "critical", "urgent"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cancelable_keywords() -> Vec<String> {
    ["optional", "social", "fyi", "list"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_large_meeting_attendee_threshold() -> i32 {
    8
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            critical_keywords: default_critical_keywords(),
            cancelable_keywords: default_cancelable_keywords(),
            large_meeting_attendee_threshold: default_large_meeting_attendee_threshold(),
            internal_domains: Vec::new(),
        }
    }
}

impl RankingRules {
    /// Reject malformed rule configurations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.large_meeting_attendee_threshold < 0 {
            return Err(ValidationError::InvalidRules(format!(
                "large_meeting_attendee_threshold must be non-negative, got {}",
                self.large_meeting_attendee_threshold
            )));
        }
        Ok(())
    }

    /// Case-insensitive substring match of any keyword against the title.
    fn title_matches(title: &str, keywords: &[String]) -> bool {
        let title = title.to_lowercase();
        keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| title.contains(&k.to_lowercase()))
    }
}

/// Meetings grouped by tier, chronological within each tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingResult {
    pub critical: Vec<CalendarEvent>,
    pub important: Vec<CalendarEvent>,
    pub moderate: Vec<CalendarEvent>,
    pub cancelable: Vec<CalendarEvent>,
}

impl RankingResult {
    /// Events in one tier.
    pub fn tier(&self, tier: PriorityTier) -> &[CalendarEvent] {
        match tier {
            PriorityTier::Critical => &self.critical,
            PriorityTier::Important => &self.important,
            PriorityTier::Moderate => &self.moderate,
            PriorityTier::Cancelable => &self.cancelable,
        }
    }

    fn tier_mut(&mut self, tier: PriorityTier) -> &mut Vec<CalendarEvent> {
        match tier {
            PriorityTier::Critical => &mut self.critical,
            PriorityTier::Important => &mut self.important,
            PriorityTier::Moderate => &mut self.moderate,
            PriorityTier::Cancelable => &mut self.cancelable,
        }
    }

    /// Tiers in presentation order with their events.
    pub fn iter(&self) -> impl Iterator<Item = (PriorityTier, &[CalendarEvent])> + '_ {
        PriorityTier::ALL.iter().map(|tier| (*tier, self.tier(*tier)))
    }

    /// Total number of ranked events across all tiers.
    pub fn len(&self) -> usize {
        PriorityTier::ALL.iter().map(|t| self.tier(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry in the ordered rule table.
struct Rule {
    tier: PriorityTier,
    applies: fn(&RankingRules, &CalendarEvent) -> bool,
}

fn matches_critical(rules: &RankingRules, event: &CalendarEvent) -> bool {
    RankingRules::title_matches(&event.title, &rules.critical_keywords)
}

fn matches_cancelable(rules: &RankingRules, event: &CalendarEvent) -> bool {
    RankingRules::title_matches(&event.title, &rules.cancelable_keywords)
        || (event.status == ResponseStatus::Tentative
            && event.attendee_count() as i64 > i64::from(rules.large_meeting_attendee_threshold))
}

fn matches_small_internal(rules: &RankingRules, event: &CalendarEvent) -> bool {
    !event.organized_by_me
        && !event.has_external_attendees(&rules.internal_domains)
        && event.attendee_count() <= 2
}

fn matches_any(_: &RankingRules, _: &CalendarEvent) -> bool {
    true
}

/// Evaluated top to bottom; the final rule always matches.
const RULES: [Rule; 4] = [
    Rule { tier: PriorityTier::Critical, applies: matches_critical },
    Rule { tier: PriorityTier::Cancelable, applies: matches_cancelable },
    Rule { tier: PriorityTier::Moderate, applies: matches_small_internal },
    Rule { tier: PriorityTier::Important, applies: matches_any },
];

/// Classifies meetings into priority tiers.
#[derive(Debug, Clone)]
pub struct MeetingRanker {
    rules: RankingRules,
}

impl MeetingRanker {
    /// Create a ranker with the given rules.
    pub fn new(rules: RankingRules) -> Self {
        Self { rules }
    }

    /// Tier for a single event, first matching rule wins.
    pub fn classify(&self, event: &CalendarEvent) -> PriorityTier {
        for rule in &RULES {
            if (rule.applies)(&self.rules, event) {
                return rule.tier;
            }
        }
        // The final table entry matches everything.
        PriorityTier::Important
    }

    /// Partition events into tiers, chronological within each tier.
    ///
    /// Every input event lands in exactly one tier; nothing is dropped or
    /// duplicated.
    ///
    /// # Errors
    /// `InvalidRules` if the configured attendee threshold is negative;
    /// `MalformedEvent` if any event ends before it starts.
    pub fn rank(&self, events: &[CalendarEvent]) -> Result<RankingResult, ValidationError> {
        self.rules.validate()?;
        for event in events {
            event.validate()?;
        }

        let mut ordered: Vec<&CalendarEvent> = events.iter().collect();
        ordered.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

        let mut result = RankingResult::default();
        for event in ordered {
            let tier = self.classify(event);
            result.tier_mut(tier).push(event.clone());
        }
        Ok(result)
    }
}

impl Default for MeetingRanker {
    fn default() -> Self {
        Self::new(RankingRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::event::Attendee;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn meeting(id: &str, title: &str, h: u32) -> CalendarEvent {
        CalendarEvent::new(id, title, at(h, 0), at(h, 30))
    }

    fn with_attendees(mut event: CalendarEvent, count: usize) -> CalendarEvent {
        event.attendees = (0..count)
            .map(|i| Attendee {
                email: format!("person{i}@corp.example"),
                display_name: None,
                response_status: None,
                is_self: false,
                organizer: false,
            })
            .collect();
        event
    }

    #[test]
    fn critical_keyword_wins_regardless_of_other_signals() {
        let ranker = MeetingRanker::default();
        let mut event = with_attendees(meeting("1", "Production Deployment Review", 10), 12);
        event.status = ResponseStatus::Tentative;

        assert_eq!(ranker.classify(&event), PriorityTier::Critical);
    }

    #[test]
    fn large_tentative_meeting_is_cancelable() {
        let ranker = MeetingRanker::default();
        let mut event = with_attendees(meeting("1", "Quarterly All Hands", 10), 10);
        event.status = ResponseStatus::Tentative;

        assert_eq!(ranker.classify(&event), PriorityTier::Cancelable);
    }

    #[test]
    fn cancelable_keyword_matches_case_insensitively() {
        let ranker = MeetingRanker::default();
        let event = meeting("1", "Optional Standup", 9);
        assert_eq!(ranker.classify(&event), PriorityTier::Cancelable);
    }

    #[test]
    fn small_internal_sync_is_moderate() {
        let rules = RankingRules {
            internal_domains: vec!["corp.example".to_string()],
            ..RankingRules::default()
        };
        let ranker = MeetingRanker::new(rules);
        let event = with_attendees(meeting("1", "Pairing session", 14), 2);

        assert_eq!(ranker.classify(&event), PriorityTier::Moderate);
    }

    #[test]
    fn self_organized_small_sync_is_important() {
        let ranker = MeetingRanker::default();
        let mut event = with_attendees(meeting("1", "Pairing session", 14), 2);
        event.organized_by_me = true;

        assert_eq!(ranker.classify(&event), PriorityTier::Important);
    }

    #[test]
    fn external_small_meeting_is_important() {
        let rules = RankingRules {
            internal_domains: vec!["corp.example".to_string()],
            ..RankingRules::default()
        };
        let ranker = MeetingRanker::new(rules);
        let mut event = meeting("1", "Vendor check-in", 15);
        event.attendees = vec![Attendee {
            email: "sales@vendor.example".to_string(),
            display_name: None,
            response_status: None,
            is_self: false,
            organizer: false,
        }];

        assert_eq!(ranker.classify(&event), PriorityTier::Important);
    }

    #[test]
    fn precedence_critical_beats_cancelable() {
        let rules = RankingRules {
            critical_keywords: vec!["launch".to_string()],
            cancelable_keywords: vec!["launch".to_string()],
            ..RankingRules::default()
        };
        let ranker = MeetingRanker::new(rules);
        let event = meeting("1", "Launch party planning", 16);

        assert_eq!(ranker.classify(&event), PriorityTier::Critical);
    }

    #[test]
    fn rank_partitions_every_event_exactly_once() {
        let ranker = MeetingRanker::default();
        let events = vec![
            meeting("1", "Production incident review", 9),
            meeting("2", "Optional brown bag", 10),
            with_attendees(meeting("3", "1:1 with report", 11), 2),
            with_attendees(meeting("4", "Design review", 13), 5),
        ];

        let result = ranker.rank(&events).unwrap();
        assert_eq!(result.len(), events.len());

        let mut seen: Vec<&str> = result
            .iter()
            .flat_map(|(_, events)| events.iter().map(|e| e.id.as_str()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn tiers_are_chronological() {
        let ranker = MeetingRanker::default();
        let events = vec![
            meeting("late", "Weekly review", 16),
            meeting("early", "Weekly planning", 9),
        ];

        let result = ranker.rank(&events).unwrap();
        let important: Vec<&str> = result.important.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(important, vec!["early", "late"]);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let rules = RankingRules {
            large_meeting_attendee_threshold: -1,
            ..RankingRules::default()
        };
        let err = MeetingRanker::new(rules).rank(&[]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRules(_)));
    }

    #[test]
    fn missing_metadata_defaults_never_raise() {
        let ranker = MeetingRanker::default();
        // No attendees, no organizer flag, no domains configured.
        let event = meeting("1", "Mystery hold", 12);
        // Not organized by me, no external attendees, zero attendees -> moderate.
        assert_eq!(ranker.classify(&event), PriorityTier::Moderate);
    }
}
