//! Opaque OAuth credentials handled by the client.
//!
//! Neither type ever prints its secret through [`Debug`], so both can flow through
//! `#[instrument]`ed functions without leaking into logs.

use serde::{Serialize, Serializer};
use std::fmt;

/// An access token issued by the remote authorization server.
///
/// The token is stored verbatim and presented on every authorized call. It is never
/// empty; [`AccessToken::new`] refuses blank input.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token string, returning `None` if it is empty or only whitespace.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token, exactly as the server issued it.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A single-use authorization code taken from an OAuth redirect.
///
/// Exchanging the code consumes it, so the same value cannot be presented twice.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Wraps a code string, returning `None` if it is empty.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if code.is_empty() { None } else { Some(Self(code)) }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode([redacted])")
    }
}
