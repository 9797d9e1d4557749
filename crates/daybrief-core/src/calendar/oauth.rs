//! OAuth2 Authorization Code flow for the Calendar API.
//!
//! 1. Opens browser to the consent screen
//! 2. Starts a tiny localhost HTTP server to receive the callback
//! 3. Exchanges the code for an access token (+ refresh token)
//! 4. Stores tokens in the OS keyring

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpListener;

use super::keyring_store;
use crate::error::OAuthError;

/// Keyring key the tokens are stored under.
const TOKEN_KEY: &str = "google_tokens";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>, // Unix timestamp
    pub token_type: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl OAuthConfig {
    /// Google Calendar defaults for the given client credentials.
    pub fn google(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            redirect_port: 18923,
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn auth_url_full(&self) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri()),
            urlencoding::encode(&scopes),
        )
    }
}

/// Run the full OAuth2 flow: open browser -> listen for callback -> exchange code.
pub async fn authorize(config: &OAuthConfig) -> Result<OAuthTokens, OAuthError> {
    let auth_url = config.auth_url_full();
    open::that(&auth_url).map_err(|e| OAuthError::AuthorizationFailed(e.to_string()))?;

    // Listen for callback
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.redirect_port))
        .map_err(|e| OAuthError::AuthorizationFailed(e.to_string()))?;

    let (mut stream, _) = listener
        .accept()
        .map_err(|e| OAuthError::AuthorizationFailed(e.to_string()))?;
    let mut buf = [0u8; 4096];
    let n = stream
        .read(&mut buf)
        .map_err(|e| OAuthError::AuthorizationFailed(e.to_string()))?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Extract code from GET /callback?code=XXX&...
    let code = extract_code(&request)
        .ok_or_else(|| OAuthError::AuthorizationFailed("no code in callback".to_string()))?;

    // Send success response to browser
    let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Authentication successful!</h2><p>You can close this tab.</p><script>window.close()</script></body></html>";
    stream
        .write_all(response.as_bytes())
        .map_err(|e| OAuthError::AuthorizationFailed(e.to_string()))?;
    drop(stream);
    drop(listener);

    // Exchange code for tokens
    let tokens = exchange_code(config, &code).await?;
    store_tokens(&tokens)?;

    Ok(tokens)
}

/// Exchange authorization code for tokens.
async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<OAuthTokens, OAuthError> {
    let client = Client::new();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", &config.redirect_uri()),
    ];

    let resp = client
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(e.to_string()))?;

    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(e.to_string()))?;

    if let Some(error) = body.get("error") {
        return Err(OAuthError::TokenExchangeFailed(error.to_string()));
    }

    Ok(tokens_from_response(&body, None))
}

/// Refresh an access token using a refresh token and store the result.
pub async fn refresh_token(config: &OAuthConfig, refresh: &str) -> Result<OAuthTokens, OAuthError> {
    let client = Client::new();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh),
        ("grant_type", "refresh_token"),
    ];

    let resp = client
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed(e.to_string()))?;

    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed(e.to_string()))?;

    if let Some(error) = body.get("error") {
        return Err(OAuthError::TokenRefreshFailed(error.to_string()));
    }

    let tokens = tokens_from_response(&body, Some(refresh.to_string()));
    store_tokens(&tokens)?;

    Ok(tokens)
}

fn tokens_from_response(body: &serde_json::Value, fallback_refresh: Option<String>) -> OAuthTokens {
    let expires_in = body.get("expires_in").and_then(|v| v.as_i64());
    let expires_at = expires_in.map(|ei| chrono::Utc::now().timestamp() + ei);

    OAuthTokens {
        access_token: body["access_token"].as_str().unwrap_or_default().to_string(),
        refresh_token: body
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(String::from)
            .or(fallback_refresh),
        expires_at,
        token_type: body["token_type"].as_str().unwrap_or("Bearer").to_string(),
        scope: body.get("scope").and_then(|v| v.as_str()).map(String::from),
    }
}

/// Load stored tokens from the keyring.
pub fn load_tokens() -> Option<OAuthTokens> {
    keyring_store::get(TOKEN_KEY)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok())
}

/// Persist tokens to the keyring.
pub fn store_tokens(tokens: &OAuthTokens) -> Result<(), OAuthError> {
    let json = serde_json::to_string(tokens)
        .map_err(|e| OAuthError::Keyring(e.to_string()))?;
    keyring_store::set(TOKEN_KEY, &json)
}

/// Remove stored tokens.
pub fn clear_tokens() -> Result<(), OAuthError> {
    keyring_store::delete(TOKEN_KEY)
}

/// Check if stored tokens are expired (with 60s buffer).
pub fn is_expired(tokens: &OAuthTokens) -> bool {
    match tokens.expires_at {
        Some(exp) => chrono::Utc::now().timestamp() > exp - 60,
        None => false,
    }
}

fn extract_code(request: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_code_from_callback_request() {
        let request = "GET /callback?code=4%2FabcDEF&scope=calendar HTTP/1.1\r\nHost: localhost\r\n";
        assert_eq!(extract_code(request).as_deref(), Some("4/abcDEF"));
    }

    #[test]
    fn extract_code_missing_returns_none() {
        let request = "GET /callback?error=access_denied HTTP/1.1\r\n";
        assert!(extract_code(request).is_none());
    }

    #[test]
    fn auth_url_includes_scopes_and_redirect() {
        let config = OAuthConfig::google("my-client", "secret");
        let url = config.auth_url_full();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=my-client"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains(&urlencoding::encode(&config.redirect_uri()).to_string()));
    }

    #[test]
    fn token_response_keeps_fallback_refresh() {
        let body = serde_json::json!({
            "access_token": "abc",
            "token_type": "Bearer",
            "expires_in": 3600,
        });
        let tokens = tokens_from_response(&body, Some("old-refresh".to_string()));
        assert_eq!(tokens.access_token, "abc");
        assert_eq!(tokens.refresh_token.as_deref(), Some("old-refresh"));
        assert!(tokens.expires_at.is_some());
    }

    #[test]
    fn expiry_check_uses_buffer() {
        let fresh = OAuthTokens {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
            token_type: "Bearer".to_string(),
            scope: None,
        };
        assert!(!is_expired(&fresh));

        let stale = OAuthTokens {
            expires_at: Some(chrono::Utc::now().timestamp() - 10),
            ..fresh.clone()
        };
        assert!(is_expired(&stale));

        let no_expiry = OAuthTokens {
            expires_at: None,
            ..fresh
        };
        assert!(!is_expired(&no_expiry));
    }
}
