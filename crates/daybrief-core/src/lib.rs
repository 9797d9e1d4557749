//! # Daybrief Core Library
//!
//! This library provides the core logic for the daybrief calendar assistant.
//! It implements a CLI-first philosophy where all operations are available
//! via a standalone CLI binary over the same core library.
//!
//! ## Architecture
//!
//! - **Analysis**: free/busy structure of a day's events within a
//!   working-hours window, plus back-to-back statistics
//! - **Ranking**: a rule-table priority classifier that partitions meetings
//!   into four tiers for reschedule/decline decisions
//! - **Calendar**: Google Calendar client (OAuth2, fetch, create, decline,
//!   reschedule)
//! - **Config**: TOML-based working hours, thresholds, and ranking rules
//!
//! ## Key Components
//!
//! - [`ScheduleAnalyzer`]: free/busy interval analyzer
//! - [`MeetingRanker`]: priority tier classifier
//! - [`GoogleCalendar`]: calendar API client
//! - [`Config`]: application configuration management

pub mod analysis;
pub mod blocks;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod ranking;

pub use analysis::{AnalysisResult, FreeBlock, ScheduleAnalyzer, WorkWindow};
pub use blocks::{commute_block, focus_block, suggest_focus_blocks, EventColor, NewEvent};
pub use calendar::google::GoogleCalendar;
pub use config::Config;
pub use error::{CalendarError, ConfigError, CoreError, OAuthError, ValidationError};
pub use event::{Attendee, CalendarEvent, ResponseStatus};
pub use ranking::{MeetingRanker, PriorityTier, RankingResult, RankingRules};
