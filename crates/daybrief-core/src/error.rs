//! Core error types for daybrief-core.
//!
//! This module defines the error hierarchy using thiserror. Input
//! validation failures are raised synchronously and never recovered inside
//! the core -- callers decide whether to skip, abort, or prompt.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daybrief-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// OAuth-related errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Calendar API errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Timezone name not in the tz database
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Time of day not in HH:MM form
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),
}

/// OAuth-specific errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Access token expired
    #[error("Access token expired and no refresh token available")]
    TokenExpired,

    /// Not authenticated
    #[error("Not authenticated with Google Calendar")]
    NotAuthenticated,

    /// Credentials not configured
    #[error("OAuth client credentials not configured")]
    CredentialsNotConfigured,

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Keyring(String),
}

/// Calendar API errors.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Error payload returned by the API
    #[error("Calendar API error: {0}")]
    Api(String),

    /// Expected field absent from an API response
    #[error("Missing field '{0}' in API response")]
    MissingField(&'static str),

    /// Unparseable timestamp in an API response
    #[error("Invalid timestamp '{0}' in API response")]
    InvalidTimestamp(String),

    /// No event matched a title search
    #[error("No event matching '{0}'")]
    EventNotFound(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Input validation errors for the analysis and ranking engines.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Working-hours window is empty or inverted
    #[error("Invalid work window: end ({end}) must be after start ({start})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Ranking configuration is malformed
    #[error("Invalid ranking rules: {0}")]
    InvalidRules(String),

    /// Event whose end precedes its start
    #[error("Malformed event '{id}': end ({end}) precedes start ({start})")]
    MalformedEvent {
        id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
