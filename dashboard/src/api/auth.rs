//! Types for the `/auth` endpoints.

use crate::api::types::Envelope;
use serde::Deserialize;
use serde::de::IgnoredAny;

/// Top-level fields of a `GET /auth/youtube` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthUrlFields {
    /// Where to send the user's browser to start the OAuth consent flow.
    #[serde(rename = "authUrl")]
    pub auth_url: Option<String>,
}

/// Top-level fields of a `POST /auth/callback` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenFields {
    /// The access token the backend obtained for the authorization code.
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}

/// Response to [`ApiClient::get_auth_url`](crate::api::ApiClient::get_auth_url).
pub type AuthUrlResponse = Envelope<IgnoredAny, AuthUrlFields>;

/// Response to [`ApiClient::exchange_code`](crate::api::ApiClient::exchange_code).
pub type TokenExchange = Envelope<IgnoredAny, TokenFields>;
