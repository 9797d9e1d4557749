//! Google Calendar client.
//!
//! Wraps the Calendar v3 REST API behind a synchronous interface: fetching
//! a day's events, creating events (including focus and commute blocks),
//! declining, and rescheduling. OAuth2 tokens live in the OS keyring and
//! are refreshed transparently when expired.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde_json::json;

use super::keyring_store;
use super::oauth::{self, OAuthConfig};
use crate::blocks::{commute_block, focus_block, NewEvent};
use crate::error::{CalendarError, CoreError, OAuthError};
use crate::event::{Attendee, CalendarEvent, ResponseStatus};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar client for the user's primary calendar.
pub struct GoogleCalendar {
    client_id: String,
    client_secret: String,
    base_url: String,
    http: Client,
    runtime: tokio::runtime::Runtime,
}

impl GoogleCalendar {
    /// Load credentials from the keyring. Credentials may be empty until
    /// `set_credentials` has been called; `login` checks for that.
    ///
    /// # Errors
    /// Returns an error if the internal runtime cannot be created.
    pub fn new() -> Result<Self, CoreError> {
        let client_id = keyring_store::get("google_client_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")
            .ok()
            .flatten()
            .unwrap_or_default();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client_id,
            client_secret,
            base_url: API_BASE.to_string(),
            http: Client::new(),
            runtime,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Persist OAuth client credentials to the OS keyring.
    ///
    /// # Errors
    /// Returns an error if the keyring rejects the write.
    pub fn set_credentials(client_id: &str, client_secret: &str) -> Result<(), OAuthError> {
        keyring_store::set("google_client_id", client_id)?;
        keyring_store::set("google_client_secret", client_secret)?;
        Ok(())
    }

    /// Whether OAuth tokens are stored.
    pub fn is_authenticated(&self) -> bool {
        oauth::load_tokens().is_some()
    }

    /// Run the OAuth flow and store the resulting tokens.
    ///
    /// # Errors
    /// `CredentialsNotConfigured` if `set_credentials` has not been called;
    /// otherwise any authorization failure.
    pub fn login(&self) -> Result<(), CoreError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::CredentialsNotConfigured.into());
        }
        let config = self.oauth_config();
        self.runtime.block_on(oauth::authorize(&config))?;
        Ok(())
    }

    /// Remove stored tokens.
    ///
    /// # Errors
    /// Returns an error if the keyring rejects the delete.
    pub fn logout(&self) -> Result<(), CoreError> {
        oauth::clear_tokens()?;
        Ok(())
    }

    fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig::google(&self.client_id, &self.client_secret)
    }

    /// Return a valid access token, refreshing if expired.
    ///
    /// # Errors
    /// `NotAuthenticated` without stored tokens; `TokenExpired` when the
    /// token is stale and no refresh token exists; any refresh failure.
    pub fn access_token(&self) -> Result<String, CoreError> {
        let tokens = oauth::load_tokens().ok_or(OAuthError::NotAuthenticated)?;

        if !oauth::is_expired(&tokens) {
            return Ok(tokens.access_token);
        }

        let refresh = tokens.refresh_token.ok_or(OAuthError::TokenExpired)?;

        let config = self.oauth_config();
        let refreshed = self
            .runtime
            .block_on(oauth::refresh_token(&config, &refresh))?;

        Ok(refreshed.access_token)
    }

    /// Fetch all events for a date, midnight to midnight in `tz`.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn events_for_date(
        &self,
        date: NaiveDate,
        tz: Tz,
        include_declined: bool,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let start = local_midnight(date, tz)?;
        let end = local_midnight(date + chrono::Duration::days(1), tz)?;
        self.events_in_range(start, end, tz, include_declined)
    }

    /// Fetch events within a time range, expanded to single instances and
    /// ordered by start time.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
        include_declined: bool,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let token = self.access_token()?;
        self.fetch_events(&token, start, end, tz, include_declined)
    }

    fn fetch_events(
        &self,
        token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
        include_declined: bool,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let url = format!(
            "{}/calendars/primary/events?timeMin={}&timeMax={}&singleEvents=true&orderBy=startTime",
            self.base_url,
            urlencoding::encode(&start.to_rfc3339()),
            urlencoding::encode(&end.to_rfc3339()),
        );

        let resp = self.runtime.block_on(async {
            self.http
                .get(&url)
                .bearer_auth(token)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let body = resp.map_err(CalendarError::Http)?;
        check_api_error(&body)?;

        let items = body["items"]
            .as_array()
            .ok_or(CalendarError::MissingField("items"))?;

        let mut events = Vec::new();
        for item in items {
            let event = parse_event(item, tz)?;
            if include_declined || event.status != ResponseStatus::Declined {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Create an event on the primary calendar.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn create_event(&self, new_event: &NewEvent, tz: Tz) -> Result<CalendarEvent, CoreError> {
        let token = self.access_token()?;
        self.insert_event(&token, new_event, tz)
    }

    fn insert_event(
        &self,
        token: &str,
        new_event: &NewEvent,
        tz: Tz,
    ) -> Result<CalendarEvent, CoreError> {
        let mut body = json!({
            "summary": new_event.title,
            "start": { "dateTime": new_event.start.to_rfc3339() },
            "end": { "dateTime": new_event.end.to_rfc3339() },
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "popup", "minutes": new_event.reminder_minutes },
                ],
            },
        });

        if let Some(description) = &new_event.description {
            body["description"] = json!(description);
        }
        if let Some(location) = &new_event.location {
            body["location"] = json!(location);
        }
        if let Some(color) = new_event.color {
            body["colorId"] = json!(color.id());
        }

        let url = format!("{}/calendars/primary/events", self.base_url);
        let resp = self.runtime.block_on(async {
            self.http
                .post(&url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let created = resp.map_err(CalendarError::Http)?;
        check_api_error(&created)?;

        Ok(parse_event(&created, tz)?)
    }

    /// Create a focus block in the given slot.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn create_focus_block(
        &self,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        description: Option<&str>,
        tz: Tz,
    ) -> Result<CalendarEvent, CoreError> {
        self.create_event(&focus_block(title, start, end, description), tz)
    }

    /// Create a commute/buffer block in the given slot.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn create_commute_block(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        description: &str,
        tz: Tz,
    ) -> Result<CalendarEvent, CoreError> {
        self.create_event(&commute_block(start, end, description), tz)
    }

    /// Update your response status on an event.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn update_response_status(
        &self,
        event_id: &str,
        status: ResponseStatus,
        notify: bool,
    ) -> Result<(), CoreError> {
        let token = self.access_token()?;
        self.patch_response_status(&token, event_id, status, notify)
    }

    fn patch_response_status(
        &self,
        token: &str,
        event_id: &str,
        status: ResponseStatus,
        notify: bool,
    ) -> Result<(), CoreError> {
        let get_url = format!("{}/calendars/primary/events/{}", self.base_url, event_id);
        let resp = self.runtime.block_on(async {
            self.http
                .get(&get_url)
                .bearer_auth(token)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let event = resp.map_err(CalendarError::Http)?;
        check_api_error(&event)?;

        let mut attendees = event["attendees"].as_array().cloned().unwrap_or_default();
        for attendee in &mut attendees {
            if attendee["self"].as_bool().unwrap_or(false) {
                attendee["responseStatus"] = json!(status.as_api_str());
                break;
            }
        }

        let patch_url = format!(
            "{}?sendUpdates={}",
            get_url,
            if notify { "all" } else { "none" }
        );
        let resp = self.runtime.block_on(async {
            self.http
                .patch(&patch_url)
                .bearer_auth(token)
                .json(&json!({ "attendees": attendees }))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let patched = resp.map_err(CalendarError::Http)?;
        check_api_error(&patched)?;

        Ok(())
    }

    /// Decline an event.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn decline_event(&self, event_id: &str, notify: bool) -> Result<(), CoreError> {
        self.update_response_status(event_id, ResponseStatus::Declined, notify)
    }

    /// Move an event to a new slot, optionally noting why in its
    /// description.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn reschedule_event(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        message: Option<&str>,
        notify: bool,
        tz: Tz,
    ) -> Result<CalendarEvent, CoreError> {
        let token = self.access_token()?;
        self.move_event(&token, event_id, new_start, new_end, message, notify, tz)
    }

    #[allow(clippy::too_many_arguments)]
    fn move_event(
        &self,
        token: &str,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        message: Option<&str>,
        notify: bool,
        tz: Tz,
    ) -> Result<CalendarEvent, CoreError> {
        let get_url = format!("{}/calendars/primary/events/{}", self.base_url, event_id);
        let resp = self.runtime.block_on(async {
            self.http
                .get(&get_url)
                .bearer_auth(token)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let mut event = resp.map_err(CalendarError::Http)?;
        check_api_error(&event)?;

        event["start"]["dateTime"] = json!(new_start.to_rfc3339());
        event["end"]["dateTime"] = json!(new_end.to_rfc3339());

        if let Some(message) = message {
            let current = event["description"].as_str().unwrap_or_default();
            let description = if current.is_empty() {
                format!("Rescheduled: {message}")
            } else {
                format!("Rescheduled: {message}\n\n{current}")
            };
            event["description"] = json!(description);
        }

        let put_url = format!(
            "{}?sendUpdates={}",
            get_url,
            if notify { "all" } else { "none" }
        );
        let resp = self.runtime.block_on(async {
            self.http
                .put(&put_url)
                .bearer_auth(token)
                .json(&event)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        });
        let updated = resp.map_err(CalendarError::Http)?;
        check_api_error(&updated)?;

        Ok(parse_event(&updated, tz)?)
    }

    /// Find the first event on a date whose title contains the substring,
    /// case-insensitively.
    ///
    /// # Errors
    /// Authentication, transport, or response-shape failures.
    pub fn find_event_by_title(
        &self,
        title_substring: &str,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Option<CalendarEvent>, CoreError> {
        let needle = title_substring.to_lowercase();
        let events = self.events_for_date(date, tz, false)?;
        Ok(events
            .into_iter()
            .find(|e| e.title.to_lowercase().contains(&needle)))
    }
}

/// Midnight of a date in a timezone, as a UTC instant.
fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, CalendarError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| CalendarError::InvalidTimestamp(format!("{date}T00:00 in {tz}")))
}

/// Surface an API error payload as a typed error.
fn check_api_error(body: &serde_json::Value) -> Result<(), CalendarError> {
    match body.get("error") {
        Some(err) => Err(CalendarError::Api(err.to_string())),
        None => Ok(()),
    }
}

/// Map a Calendar API event resource onto a `CalendarEvent`.
///
/// All-day events carry `date` instead of `dateTime` and are anchored to
/// midnight in the user's timezone. Your own response status comes from the
/// attendee entry marked `self`.
fn parse_event(item: &serde_json::Value, tz: Tz) -> Result<CalendarEvent, CalendarError> {
    let id = item["id"]
        .as_str()
        .ok_or(CalendarError::MissingField("id"))?
        .to_string();
    let title = item["summary"].as_str().unwrap_or("No Title").to_string();

    let start = parse_event_time(&item["start"], tz)?;
    let end = parse_event_time(&item["end"], tz)?;

    let attendees: Vec<Attendee> = item["attendees"]
        .as_array()
        .map(|list| {
            list.iter()
                .map(|a| Attendee {
                    email: a["email"].as_str().unwrap_or_default().to_string(),
                    display_name: a["displayName"].as_str().map(String::from),
                    response_status: a["responseStatus"]
                        .as_str()
                        .map(ResponseStatus::from_api_str),
                    is_self: a["self"].as_bool().unwrap_or(false),
                    organizer: a["organizer"].as_bool().unwrap_or(false),
                })
                .collect()
        })
        .unwrap_or_default();

    let status = attendees
        .iter()
        .find(|a| a.is_self)
        .and_then(|a| a.response_status)
        .unwrap_or(ResponseStatus::Accepted);

    let description = item["description"].as_str().map(String::from);

    let mut has_meeting_link = item.get("hangoutLink").and_then(|v| v.as_str()).is_some();
    if !has_meeting_link {
        if let Some(desc) = &description {
            let desc = desc.to_lowercase();
            has_meeting_link = ["zoom", "meet", "teams"].iter().any(|k| desc.contains(k));
        }
    }

    Ok(CalendarEvent {
        id,
        title,
        start,
        end,
        status,
        location: item["location"].as_str().map(String::from),
        description,
        attendees,
        organized_by_me: item["organizer"]["self"].as_bool().unwrap_or(false),
        has_meeting_link,
    })
}

/// Parse a Calendar API `start`/`end` object: `dateTime` for timed events,
/// `date` for all-day events.
fn parse_event_time(value: &serde_json::Value, tz: Tz) -> Result<DateTime<Utc>, CalendarError> {
    if let Some(datetime) = value["dateTime"].as_str() {
        return DateTime::parse_from_rfc3339(datetime)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CalendarError::InvalidTimestamp(datetime.to_string()));
    }
    if let Some(date) = value["date"].as_str() {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CalendarError::InvalidTimestamp(date.to_string()))?;
        return local_midnight(parsed, tz);
    }
    Err(CalendarError::MissingField("dateTime"))
}
