//! TOML-based application configuration.
//!
//! Stores the assistant's preferences:
//! - Working hours and timezone
//! - Analysis thresholds (back-to-back gap, focus-block minimum)
//! - Ranking rules (keyword sets, attendee threshold, internal domains)
//!
//! Configuration is stored at `~/.config/daybrief/config.toml`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::WorkWindow;
use crate::error::{ConfigError, CoreError};
use crate::ranking::RankingRules;

/// Returns `~/.config/daybrief[-dev]/` based on DAYBRIEF_ENV.
///
/// Set DAYBRIEF_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYBRIEF_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daybrief-dev")
    } else {
        base_dir.join("daybrief")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Working-hours configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursConfig {
    /// Start of the working day, HH:MM
    #[serde(default = "default_work_start")]
    pub work_start: String,
    /// End of the working day, HH:MM
    #[serde(default = "default_work_end")]
    pub work_end: String,
    /// IANA timezone the working hours are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Analysis thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Gaps shorter than this count as back-to-back
    #[serde(default = "default_back_to_back_threshold")]
    pub back_to_back_threshold_minutes: i64,
    /// Free blocks shorter than this are not suggested for focus work
    #[serde(default = "default_min_focus_block")]
    pub min_focus_block_minutes: i64,
}

// Default functions
fn default_work_start() -> String {
    "09:00".to_string()
}
fn default_work_end() -> String {
    "18:00".to_string()
}
fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}
fn default_back_to_back_threshold() -> i64 {
    15
}
fn default_min_focus_block() -> i64 {
    30
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            work_end: default_work_end(),
            timezone: default_timezone(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            back_to_back_threshold_minutes: default_back_to_back_threshold(),
            min_focus_block_minutes: default_min_focus_block(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daybrief/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub ranking: RankingRules,
}

impl Config {
    /// Path of the config file on disk.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// The configured timezone.
    ///
    /// # Errors
    /// `UnknownTimezone` if the name is not in the tz database.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.hours
            .timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(self.hours.timezone.clone()))
    }

    /// The working-hours window for a given date, in UTC.
    ///
    /// # Errors
    /// Fails on malformed times, unknown timezones, or an inverted window.
    pub fn work_window_for(&self, date: NaiveDate) -> Result<WorkWindow, CoreError> {
        let tz = self.timezone()?;
        let start = local_instant(tz, date, parse_time_of_day(&self.hours.work_start)?)?;
        let end = local_instant(tz, date, parse_time_of_day(&self.hours.work_end)?)?;
        Ok(WorkWindow::new(start, end)?)
    }

    /// Today's date in the configured timezone.
    ///
    /// # Errors
    /// `UnknownTimezone` if the configured timezone cannot be parsed.
    pub fn today(&self) -> Result<NaiveDate, ConfigError> {
        Ok(Utc::now().with_timezone(&self.timezone()?).date_naive())
    }

    /// Ranking rules for the meeting ranker.
    pub fn ranking_rules(&self) -> RankingRules {
        self.ranking.clone()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let unparseable = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| unparseable(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(unparseable(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| unparseable(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }
}

/// Parse an HH:MM time of day.
fn parse_time_of_day(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| ConfigError::InvalidTimeOfDay(s.to_string()))
}

/// Resolve a local date + time in a timezone to a UTC instant. Ambiguous
/// local times (DST fold) take the earlier instant; nonexistent local times
/// (DST gap) are an error.
fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, CoreError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "hours".to_string(),
                message: format!("{date} {time} does not exist in {tz}"),
            }
            .into()
        })
}
