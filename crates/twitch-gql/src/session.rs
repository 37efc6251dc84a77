//! Client session collaborator supplying per-request identity headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};

/// Twitch GQL endpoint.
pub const GQL_URL: &str = "https://gql.twitch.tv/gql";

/// Client id of the Twitch web player.
pub const CLIENT_ID: &str = "kimne78kx3ncx6brgo4mv6wki5h1ko";

/// Opaque session state established elsewhere; this crate only reads it.
#[derive(Debug, Clone)]
pub struct ClientSession {
    /// OAuth access token.
    pub auth_token: String,
    /// Session identifier.
    pub session_id: String,
    /// Web client version string.
    pub client_version: String,
    /// Browser user agent.
    pub user_agent: String,
    /// Device identifier.
    pub device_id: String,
}

impl ClientSession {
    /// Create a session from its parts.
    pub fn new(
        auth_token: impl Into<String>,
        session_id: impl Into<String>,
        client_version: impl Into<String>,
        user_agent: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            session_id: session_id.into(),
            client_version: client_version.into(),
            user_agent: user_agent.into(),
            device_id: device_id.into(),
        }
    }

    /// Headers attached to every GQL request.
    ///
    /// Values that cannot be encoded as a header are skipped rather than
    /// failing the call.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("OAuth {}", self.auth_token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            HeaderName::from_static("client-id"),
            HeaderValue::from_static(CLIENT_ID),
        );
        for (name, source) in [
            ("client-session-id", &self.session_id),
            ("client-version", &self.client_version),
            ("x-device-id", &self.device_id),
        ] {
            if let Ok(value) = HeaderValue::from_str(source) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers
    }
}
