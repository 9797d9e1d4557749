//! Integration tests for the meeting ranker.
//!
//! The partition law (every event in exactly one tier) and the precedence
//! law (critical beats cancelable) are the core guarantees.

use chrono::{DateTime, Duration, TimeZone, Utc};
use daybrief_core::{Attendee, CalendarEvent, MeetingRanker, PriorityTier, RankingRules, ResponseStatus};
use proptest::prelude::*;

fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

fn attendees(count: usize) -> Vec<Attendee> {
    (0..count)
        .map(|i| Attendee {
            email: format!("person{i}@corp.example"),
            display_name: None,
            response_status: None,
            is_self: false,
            organizer: false,
        })
        .collect()
}

fn title_pool() -> Vec<&'static str> {
    vec![
        "Production deploy review",
        "Urgent escalation",
        "GTM planning",
        "Optional social hour",
        "FYI: roadmap list",
        "Team sync",
        "1:1 with manager",
        "Architecture deep dive",
        "Customer onboarding",
        "Weekly review",
    ]
}

fn meeting_set() -> impl Strategy<Value = Vec<CalendarEvent>> {
    let status = prop::sample::select(vec![
        ResponseStatus::Accepted,
        ResponseStatus::Tentative,
        ResponseStatus::NeedsAction,
    ]);
    proptest::collection::vec(
        (
            prop::sample::select(title_pool()),
            0i64..480,
            0usize..12,
            status,
            proptest::bool::ANY,
        ),
        0..16,
    )
    .prop_map(|entries| {
        entries.into_iter()
            .enumerate()
            .map(|(i, (title, offset, attendee_count, status, organized_by_me))| {
                let start = nine_am() + Duration::minutes(offset);
                let mut event =
                    CalendarEvent::new(i.to_string(), title, start, start + Duration::minutes(30));
                event.attendees = attendees(attendee_count);
                event.status = status;
                event.organized_by_me = organized_by_me;
                event
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn every_event_lands_in_exactly_one_tier(events in meeting_set()) {
        let ranking = MeetingRanker::default().rank(&events).unwrap();
        prop_assert_eq!(ranking.len(), events.len());

        let mut ranked_ids: Vec<String> = ranking
            .iter()
            .flat_map(|(_, tier_events)| tier_events.iter().map(|e| e.id.clone()))
            .collect();
        ranked_ids.sort_unstable();

        let mut input_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
        input_ids.sort_unstable();

        prop_assert_eq!(ranked_ids, input_ids);
    }

    #[test]
    fn tiers_stay_chronological(events in meeting_set()) {
        let ranking = MeetingRanker::default().rank(&events).unwrap();
        for (_, tier_events) in ranking.iter() {
            for pair in tier_events.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
            }
        }
    }

    #[test]
    fn classification_ignores_input_order(mut events in meeting_set()) {
        let ranker = MeetingRanker::default();
        let forward = ranker.rank(&events).unwrap();
        events.reverse();
        let backward = ranker.rank(&events).unwrap();

        for tier in PriorityTier::ALL {
            let forward_ids: Vec<&str> = forward.tier(tier).iter().map(|e| e.id.as_str()).collect();
            let backward_ids: Vec<&str> = backward.tier(tier).iter().map(|e| e.id.as_str()).collect();
            prop_assert_eq!(forward_ids, backward_ids);
        }
    }
}

#[test]
fn critical_keyword_overrides_everything_else() {
    // Tentative, large, and keyword-matching on both lists: rule 1 wins.
    let start = nine_am();
    let mut event = CalendarEvent::new(
        "1",
        "Production Deployment Review",
        start,
        start + Duration::minutes(30),
    );
    event.status = ResponseStatus::Tentative;
    event.attendees = attendees(20);

    let rules = RankingRules {
        critical_keywords: vec!["production".to_string(), "deploy".to_string()],
        cancelable_keywords: vec!["review".to_string()],
        ..RankingRules::default()
    };
    let ranking = MeetingRanker::new(rules).rank(&[event]).unwrap();

    assert_eq!(ranking.critical.len(), 1);
    assert!(ranking.cancelable.is_empty());
}

#[test]
fn large_tentative_meeting_is_a_cancel_candidate() {
    let start = nine_am();
    let mut event =
        CalendarEvent::new("1", "Optional Standup", start, start + Duration::minutes(15));
    event.status = ResponseStatus::Tentative;
    event.attendees = attendees(10);

    let ranking = MeetingRanker::default().rank(&[event]).unwrap();
    assert_eq!(ranking.cancelable.len(), 1);
}

#[test]
fn threshold_boundary_is_exclusive() {
    // Exactly at the threshold is not "large".
    let start = nine_am();
    let mut event =
        CalendarEvent::new("1", "Team planning", start, start + Duration::minutes(30));
    event.status = ResponseStatus::Tentative;
    event.attendees = attendees(8);
    event.organized_by_me = true;

    let ranking = MeetingRanker::default().rank(&[event]).unwrap();
    assert_eq!(ranking.important.len(), 1);
}

#[test]
fn invalid_rules_fail_before_any_event_is_ranked() {
    let start = nine_am();
    let event = CalendarEvent::new("1", "Team sync", start, start + Duration::minutes(30));
    let rules = RankingRules {
        large_meeting_attendee_threshold: -5,
        ..RankingRules::default()
    };

    assert!(MeetingRanker::new(rules).rank(&[event]).is_err());
}
