//! The client-side authentication session.
//!
//! [`SessionStore`] is constructed once at startup and handed by reference to everything
//! that needs to know whether the user is signed in. It is the only place the access
//! token lives in memory, and the only thing that writes it to (or removes it from)
//! durable storage.

use crate::credentials::AccessToken;
use crate::storage::TokenStorage;
use eyre::Context;

/// Storage key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "youtube_access_token";

/// Whether the user is authenticated, and with which token.
///
/// Authentication is derived from the presence of a token, so the two can never
/// disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<AccessToken>,
}

impl Session {
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Owns the [`Session`] and keeps it in sync with durable storage.
#[derive(Debug)]
pub struct SessionStore<S> {
    session: Session,
    storage: S,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Restores the session from `storage`.
    ///
    /// A stored token makes the session authenticated; a missing, blank, or unreadable
    /// entry leaves it unauthenticated.
    pub fn initialize(storage: S) -> Self {
        let access_token = match storage.get(ACCESS_TOKEN_KEY) {
            Ok(stored) => stored.and_then(AccessToken::new),
            Err(e) => {
                tracing::warn!("could not read stored access token: {e:#}");
                None
            }
        };
        tracing::debug!(
            authenticated = access_token.is_some(),
            "restored session from storage"
        );

        Self {
            session: Session { access_token },
            storage,
        }
    }

    /// Marks the session authenticated with `token` and persists it.
    ///
    /// The token is written to storage first; if that write fails the in-memory session
    /// is left as it was.
    pub fn login(&mut self, token: AccessToken) -> eyre::Result<()> {
        self.storage
            .set(ACCESS_TOKEN_KEY, token.secret())
            .context("persist access token")?;
        self.session.access_token = Some(token);
        tracing::info!("session authenticated");
        Ok(())
    }

    /// Clears the session and removes the persisted token.
    ///
    /// Calling this on an already signed-out session changes nothing.
    pub fn logout(&mut self) -> eyre::Result<()> {
        let was_authenticated = self.session.access_token.take().is_some();
        self.storage
            .remove(ACCESS_TOKEN_KEY)
            .context("remove persisted access token")?;
        if was_authenticated {
            tracing::info!("session cleared");
        }
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.session.access_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives back the underlying storage, dropping the in-memory session.
    pub fn into_storage(self) -> S {
        self.storage
    }
}
