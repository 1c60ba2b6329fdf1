//! A terminal client for the YouTube dashboard backend.
//!
//! The backend holds the YouTube credentials and does the actual work; this crate owns
//! the client side of it: who is signed in ([`session`]), how a sign-in completes
//! ([`callback`], [`redirect`]), how the backend is called ([`api`]), and what the user
//! sees ([`views`]).

pub mod api;
pub mod callback;
pub mod config;
pub mod credentials;
pub mod notifications;
pub mod redirect;
pub mod routes;
pub mod session;
pub mod storage;
pub mod views;

pub use api::ApiClient;
pub use callback::{AuthCallback, CallbackParams, CallbackState};
pub use config::Config;
pub use credentials::{AccessToken, AuthorizationCode};
pub use session::{Session, SessionStore};
