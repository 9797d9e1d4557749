//! Free/busy analysis of a day's schedule.
//!
//! Finds the free blocks between events inside a working-hours window and
//! computes aggregate time statistics. Overlapping events are merged before
//! busy time is summed, so double-booked slots are never counted twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::{CalendarEvent, ResponseStatus};

/// Working-hours window that bounds the free-block search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WorkWindow {
    /// Create a window. Rejects empty or inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.end <= self.start {
            return Err(ValidationError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A maximal gap with no overlapping event inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeBlock {
    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this block can fit a task of the given duration.
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Aggregate schedule statistics for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Events considered, excluding the assistant's own focus/commute blocks
    pub meeting_count: usize,
    /// Total merged busy time inside the window
    pub busy_minutes: i64,
    /// Window duration minus busy time
    pub free_minutes: i64,
    /// Ordered complement of the busy intervals inside the window
    pub free_blocks: Vec<FreeBlock>,
    /// Adjacent event pairs closer than the configured threshold
    pub back_to_back_count: usize,
    /// Declined events excluded from the busy computation
    pub declined_count: usize,
    /// Time in focus blocks, clipped to the window
    pub focus_minutes: i64,
}

/// Free/busy analyzer for a day's events.
#[derive(Debug, Clone)]
pub struct ScheduleAnalyzer {
    back_to_back_threshold_minutes: i64,
}

/// An event clipped to the window bounds.
struct Clipped<'a> {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    event: &'a CalendarEvent,
}

impl ScheduleAnalyzer {
    /// Create an analyzer with the default 15-minute back-to-back threshold.
    pub fn new() -> Self {
        Self {
            back_to_back_threshold_minutes: 15,
        }
    }

    /// Set the back-to-back threshold.
    pub fn with_back_to_back_threshold(mut self, minutes: i64) -> Self {
        self.back_to_back_threshold_minutes = minutes;
        self
    }

    /// Analyze a day's events within the working-hours window.
    ///
    /// Events need not be sorted or non-overlapping. Declined events and
    /// zero-duration markers are excluded from busy time; declined events
    /// are reported separately in the result. An empty event list yields a
    /// single free block spanning the whole window.
    ///
    /// # Errors
    /// `InvalidWindow` if the window is empty or inverted; `MalformedEvent`
    /// if any event ends before it starts.
    pub fn analyze(
        &self,
        events: &[CalendarEvent],
        window: &WorkWindow,
    ) -> Result<AnalysisResult, ValidationError> {
        window.validate()?;

        let mut declined_count = 0usize;
        let mut clipped: Vec<Clipped> = Vec::new();

        for event in events {
            event.validate()?;
            if event.status == ResponseStatus::Declined {
                declined_count += 1;
                continue;
            }
            if event.is_zero_duration() {
                continue;
            }
            let start = event.start.max(window.start);
            let end = event.end.min(window.end);
            if start >= end {
                continue;
            }
            clipped.push(Clipped { start, end, event });
        }

        // Deterministic merge order: by start, shorter events first on ties.
        clipped.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

        let busy = merge_intervals(&clipped);
        let busy_minutes: i64 = busy.iter().map(|(s, e)| (*e - *s).num_minutes()).sum();
        let free_minutes = window.duration_minutes() - busy_minutes;

        // Free blocks are the complement of the merged busy intervals.
        let mut free_blocks = Vec::new();
        let mut cursor = window.start;
        for (start, end) in &busy {
            if *start > cursor {
                free_blocks.push(FreeBlock {
                    start: cursor,
                    end: *start,
                });
            }
            cursor = *end;
        }
        if cursor < window.end {
            free_blocks.push(FreeBlock {
                start: cursor,
                end: window.end,
            });
        }

        // Adjacency is counted on the pre-merge ordering; overlapping
        // events count as a zero-gap pair.
        let back_to_back_count = clipped
            .windows(2)
            .filter(|pair| {
                let gap = (pair[1].start - pair[0].end).num_minutes().max(0);
                gap < self.back_to_back_threshold_minutes
            })
            .count();

        let meeting_count = clipped
            .iter()
            .filter(|c| !c.event.is_focus_block() && !c.event.is_commute())
            .count();
        let focus_minutes = clipped
            .iter()
            .filter(|c| c.event.is_focus_block())
            .map(|c| (c.end - c.start).num_minutes())
            .sum();

        Ok(AnalysisResult {
            meeting_count,
            busy_minutes,
            free_minutes,
            free_blocks,
            back_to_back_count,
            declined_count,
            focus_minutes,
        })
    }
}

impl Default for ScheduleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge sorted intervals where the later starts at or before the earlier's
/// end. The result is a minimal sorted set of disjoint busy intervals.
fn merge_intervals(clipped: &[Clipped]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for c in clipped {
        match merged.last_mut() {
            Some((_, last_end)) if c.start <= *last_end => {
                if c.end > *last_end {
                    *last_end = c.end;
                }
            }
            _ => merged.push((c.start, c.end)),
        }
    }
    merged
}
